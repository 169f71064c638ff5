use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    #[serde(default)]
    pub salary_range: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    pub contact_email: String,
    #[serde(default)]
    pub posted_date: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
