//! Liveness endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/live/health - No auth; checks the database answers.
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .db_pool
        .ping()
        .await
        .map_err(|e| AppError::Internal(format!("Database unavailable: {e}")))?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
        request_id,
        elapsed,
    )))
}
