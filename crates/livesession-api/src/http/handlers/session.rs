//! Live session CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/live/session         - Open a session
//! - GET    /api/v1/live/session/active  - Most recent active session (or null)
//! - GET    /api/v1/live/session/{id}    - Get a single session
//! - PUT    /api/v1/live/session/{id}    - Partial update
//! - DELETE /api/v1/live/session/{id}    - Delete a session and its transcripts
//! - GET    /api/v1/live/sessions        - List the caller's sessions

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use livesession_core::session::service::DEFAULT_SESSION_LIMIT;
use livesession_types::session::{CreateSessionRequest, LiveSession, UpdateSessionRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::input::{AppJson, AppPath, AppQuery};
use crate::http::extractors::query::PageQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/live/session - Open a new session for the caller.
pub async fn create_session(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(body): AppJson<CreateSessionRequest>,
) -> Result<Json<ApiResponse<LiveSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let gemini = state.gemini_config().await;
    let session = state
        .session_service
        .create_session(&user.user_id, body, &gemini)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/live/session/{}", session.id);
    Ok(Json(ApiResponse::success(session, request_id, elapsed).with_link("self", &link)))
}

/// GET /api/v1/live/session/{id} - Fetch a session the caller owns.
pub async fn get_session(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<ApiResponse<LiveSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .session_service
        .get_owned_session(&id, &user.user_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(session, request_id, elapsed)
            .with_link("self", &format!("/api/v1/live/session/{id}"))
            .with_link("transcripts", &format!("/api/v1/live/transcripts/{id}"))
            .with_link("context", &format!("/api/v1/live/context/{id}")),
    ))
}

/// GET /api/v1/live/sessions - List the caller's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<LiveSession>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state
        .session_service
        .list_sessions(
            &user.user_id,
            query.limit.unwrap_or(DEFAULT_SESSION_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(sessions, request_id, elapsed).with_link("self", "/api/v1/live/sessions"),
    ))
}

/// GET /api/v1/live/session/active - The caller's most recent active session.
///
/// `data` is `null` when there is none.
pub async fn get_active_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Option<LiveSession>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .session_service
        .get_active_session(&user.user_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(session, request_id, elapsed)))
}

/// PUT /api/v1/live/session/{id} - Update title, summary, or status.
pub async fn update_session(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<UpdateSessionRequest>,
) -> Result<Json<ApiResponse<LiveSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .session_service
        .update_session(&id, &user.user_id, body)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(session, request_id, elapsed)
            .with_link("self", &format!("/api/v1/live/session/{id}")),
    ))
}

/// DELETE /api/v1/live/session/{id} - Delete a session and its transcripts.
pub async fn delete_session(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .session_service
        .delete_session(&id, &user.user_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "success": true, "session_id": id }),
        request_id,
        elapsed,
    )))
}
