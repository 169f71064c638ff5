use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessagePayload {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminReplyPayload {
    pub user_id: i64,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}
