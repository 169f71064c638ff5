use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub job_type: String,
    pub salary_range: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    pub requirements: Option<String>,
    #[validate(email)]
    pub contact_email: String,
    pub is_active: Option<bool>,
}
