use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub subscription_type: Option<String>,
    /// ISO-8601 expiry, paired with subscription_type.
    #[serde(default)]
    pub subscription_expires: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn has_active_subscription(&self) -> bool {
        let (Some(_), Some(expires)) = (&self.subscription_type, &self.subscription_expires) else {
            return false;
        };
        match chrono::DateTime::parse_from_rfc3339(expires) {
            Ok(dt) => dt > Utc::now(),
            Err(_) => false,
        }
    }
}
