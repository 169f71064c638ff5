use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub subscription_type: Option<String>,
    pub subscription_expires: Option<String>,
    pub is_superuser: bool,
    pub has_active_subscription: bool,
}

impl From<crate::models::user::User> for UserResponse {
    fn from(user: crate::models::user::User) -> Self {
        let has_active_subscription = user.has_active_subscription();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            subscription_type: user.subscription_type,
            subscription_expires: user.subscription_expires,
            is_superuser: user.is_superuser,
            has_active_subscription,
        }
    }
}
