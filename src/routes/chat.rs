use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::chat_dto::{AdminReplyPayload, SendMessagePayload},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn my_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let messages = state.chat_service.messages_for(user_id).await;
    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let user = state
        .user_service
        .get_by_id(user_id)
        .await
        .ok_or_else(|| Error::Unauthorized("Unknown user".to_string()))?;
    let message = state
        .chat_service
        .add_message(user_id, &user.username, &payload.message, false)
        .await
        .ok_or_else(|| Error::Internal("Failed to save message".to_string()))?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[axum::debug_handler]
pub async fn all_messages(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let messages = state.chat_service.all_messages().await;
    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn admin_reply(
    State(state): State<AppState>,
    Json(payload): Json<AdminReplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if state.user_service.get_by_id(payload.user_id).await.is_none() {
        return Err(Error::NotFound(format!(
            "User {} not found",
            payload.user_id
        )));
    }
    let message = state
        .chat_service
        .add_message(payload.user_id, "Support", &payload.message, true)
        .await
        .ok_or_else(|| Error::Internal("Failed to save message".to_string()))?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<impl IntoResponse> {
    if !state.chat_service.mark_read(message_id).await {
        return Err(Error::NotFound(format!(
            "Message {message_id} not found"
        )));
    }
    Ok(Json(json!({ "read": true })))
}
