use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/results",
    responses(
        (status = 200, description = "Current user's results, most recent first"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn list_my_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let results = state.result_service.list_for_user(user_id).await;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(
        ("id" = i64, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "One practice result"),
        (status = 403, description = "Result belongs to another user"),
        (status = 404, description = "Result not found")
    )
)]
#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| Error::Unauthorized("Invalid token subject".to_string()))?;
    let result = state
        .result_service
        .get_result(result_id, false)
        .await
        .ok_or_else(|| Error::NotFound(format!("Result {result_id} not found")))?;
    if !claims.is_admin() && result.user_id != Some(user_id) {
        return Err(Error::Forbidden(
            "This result belongs to another user".to_string(),
        ));
    }
    Ok(Json(result))
}

/// Mock results are viewable without an account: anonymous takers get the
/// result id back at submit time and nothing else identifies them.
#[utoipa::path(
    get,
    path = "/api/mock-results/{id}",
    params(
        ("id" = i64, Path, description = "Mock result ID")
    ),
    responses(
        (status = 200, description = "One mock result"),
        (status = 404, description = "Result not found")
    )
)]
#[axum::debug_handler]
pub async fn get_mock_result(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let result = state
        .result_service
        .get_result(result_id, true)
        .await
        .ok_or_else(|| Error::NotFound(format!("Result {result_id} not found")))?;
    Ok(Json(result))
}
