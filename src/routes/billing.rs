use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::billing_dto::{CheckoutPayload, CheckoutResponse, SubscriptionSuccessQuery},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

const SUBSCRIPTION_DAYS: i64 = 30;

fn price_id_for(plan: &str) -> Result<&'static str> {
    match plan {
        "monthly" => Ok("price_oet_premium_monthly"),
        "yearly" => Ok("price_oet_premium_yearly"),
        other => Err(Error::BadRequest(format!("Unknown plan '{other}'"))),
    }
}

#[axum::debug_handler]
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let price_id = price_id_for(&payload.plan)?;

    let config = crate::config::get_config();
    let success_url = format!(
        "{}/subscription/success?session_id={{CHECKOUT_SESSION_ID}}",
        config.webapp_url
    );
    let cancel_url = format!("{}/subscription/cancel", config.webapp_url);

    let session = state
        .billing_service
        .create_checkout_session(price_id, &user_id.to_string(), &success_url, &cancel_url)
        .await?;
    let checkout_url = session
        .url
        .ok_or_else(|| Error::Internal("Checkout session has no redirect URL".to_string()))?;

    info!(user_id, session_id = %session.id, plan = %payload.plan, "Created checkout session");
    Ok(Json(CheckoutResponse { checkout_url }))
}

/// Success-redirect landing: confirm the session really is paid before
/// activating the subscription. The redirect alone proves nothing.
#[axum::debug_handler]
pub async fn subscription_success(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SubscriptionSuccessQuery>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;

    let session = state
        .billing_service
        .retrieve_checkout_session(&query.session_id)
        .await?;
    if session.payment_status != "paid" {
        return Err(Error::BadRequest(
            "Checkout session is not paid".to_string(),
        ));
    }

    let expires_at = Utc::now() + Duration::days(SUBSCRIPTION_DAYS);
    if !state
        .user_service
        .update_subscription(user_id, "premium", expires_at)
        .await
    {
        return Err(Error::Internal("Failed to activate subscription".to_string()));
    }

    info!(user_id, session_id = %session.id, "Activated premium subscription");
    Ok(Json(json!({
        "subscription_type": "premium",
        "expires_at": expires_at.to_rfc3339(),
    })))
}

#[axum::debug_handler]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::BadRequest("Missing Stripe-Signature header".to_string()))?;
    if !state
        .billing_service
        .verify_webhook_signature(&body, signature)
    {
        return Err(Error::Unauthorized("Invalid webhook signature".to_string()));
    }

    let event: serde_json::Value = serde_json::from_str(&body)?;
    let event_type = event["type"].as_str().unwrap_or("unknown");
    match event_type {
        "checkout.session.completed" => {
            let user_id = event["data"]["object"]["client_reference_id"]
                .as_str()
                .and_then(|id| id.parse::<i64>().ok());
            match user_id {
                Some(user_id) => {
                    let expires_at = Utc::now() + Duration::days(SUBSCRIPTION_DAYS);
                    if state
                        .user_service
                        .update_subscription(user_id, "premium", expires_at)
                        .await
                    {
                        info!(user_id, "Activated premium subscription from webhook");
                    } else {
                        warn!(user_id, "Completed session references unknown user");
                    }
                }
                None => warn!("Completed session carries no client reference"),
            }
        }
        "customer.subscription.deleted" => {
            warn!(event_type, "Subscription cancelled");
        }
        other => {
            info!(event_type = other, "Ignoring unhandled billing event");
        }
    }

    Ok(Json(json!({ "received": true })))
}
