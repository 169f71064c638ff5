use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::job_dto::JobPayload,
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Active job postings")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.active().await;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "One job posting"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .get(job_id)
        .await
        .ok_or_else(|| Error::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn list_all_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.all().await;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job_id = state
        .job_service
        .create(payload)
        .await
        .ok_or_else(|| Error::Internal("Failed to save job".to_string()))?;
    Ok((StatusCode::CREATED, Json(json!({ "job_id": job_id }))))
}

#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !state.job_service.update(job_id, payload).await {
        return Err(Error::NotFound(format!("Job {job_id} not found")));
    }
    Ok(Json(json!({ "updated": true })))
}

#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    if !state.job_service.delete(job_id).await {
        return Err(Error::NotFound(format!("Job {job_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
