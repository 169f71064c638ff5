use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutPayload {
    /// Subscription plan: "monthly" or "yearly".
    #[validate(length(min = 1))]
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionSuccessQuery {
    pub session_id: String,
}
