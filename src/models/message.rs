use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_admin_reply: bool,
    #[serde(default)]
    pub is_read: bool,
}
