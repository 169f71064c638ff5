use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::vocab_dto::{VocabularyQuery, WordCheckPayload, WordPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/vocabulary",
    params(
        ("specialty" = Option<String>, Query, description = "Filter words by specialty")
    ),
    responses(
        (status = 200, description = "Vocabulary words")
    )
)]
#[axum::debug_handler]
pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<VocabularyQuery>,
) -> Result<impl IntoResponse> {
    let words = state
        .vocabulary_service
        .words(query.specialty.as_deref())
        .await;
    Ok(Json(words))
}

#[axum::debug_handler]
pub async fn check_word(
    State(state): State<AppState>,
    Json(payload): Json<WordCheckPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let check = state.vocabulary_service.check_word(&payload.word).await;
    Ok(Json(check))
}

#[axum::debug_handler]
pub async fn my_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let progress = state.vocabulary_service.progress_for(user_id).await;
    Ok(Json(progress))
}

#[axum::debug_handler]
pub async fn mark_learned(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(word_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    if state
        .vocabulary_service
        .get_word(word_id)
        .await
        .is_none()
    {
        return Err(Error::NotFound(format!("Word {word_id} not found")));
    }
    let newly_learned = state.vocabulary_service.mark_learned(user_id, word_id).await;
    Ok(Json(json!({ "learned": true, "newly_learned": newly_learned })))
}

#[axum::debug_handler]
pub async fn add_word(
    State(state): State<AppState>,
    Json(payload): Json<WordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !state
        .vocabulary_service
        .add_word(&payload.word, &payload.definition, &payload.specialty)
        .await
    {
        return Err(Error::Internal("Failed to save word".to_string()));
    }
    Ok(StatusCode::CREATED)
}

#[axum::debug_handler]
pub async fn update_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
    Json(payload): Json<WordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !state
        .vocabulary_service
        .update_word(word_id, &payload.word, &payload.definition, &payload.specialty)
        .await
    {
        return Err(Error::NotFound(format!("Word {word_id} not found")));
    }
    Ok(Json(json!({ "updated": true })))
}

#[axum::debug_handler]
pub async fn delete_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
) -> Result<impl IntoResponse> {
    if !state.vocabulary_service.delete_word(word_id).await {
        return Err(Error::NotFound(format!("Word {word_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
