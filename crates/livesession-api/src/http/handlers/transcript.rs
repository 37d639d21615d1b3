//! Transcript HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/live/transcript                         - Append one turn
//! - GET  /api/v1/live/transcripts/{id}                   - Paged, oldest first
//! - GET  /api/v1/live/transcripts/{id}/recent            - Tail window + formatted text
//! - GET  /api/v1/live/transcripts/{id}/since/{timestamp} - Incremental sync
//! - GET  /api/v1/live/context/{id}                       - Restoration context

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use livesession_core::context::ContextFormatter;
use livesession_core::session::service::{DEFAULT_RECENT_LIMIT, DEFAULT_TRANSCRIPT_LIMIT};
use livesession_types::session::{CreateTranscriptRequest, RestorationContext, TranscriptEntry};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::input::{AppJson, AppPath, AppQuery};
use crate::http::extractors::query::{ContextQuery, PageQuery, RecentQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Tail of a conversation plus its `[USER]`/`[GEMINI]` rendering.
#[derive(Debug, Serialize)]
pub struct RecentTranscripts {
    pub transcripts: Vec<TranscriptEntry>,
    pub formatted: String,
}

/// POST /api/v1/live/transcript - Append a turn to a session the caller owns.
pub async fn add_transcript(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(body): AppJson<CreateTranscriptRequest>,
) -> Result<Json<ApiResponse<TranscriptEntry>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = state
        .session_service
        .add_transcript(&user.user_id, body)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/live/transcripts/{}", entry.session_id);
    Ok(Json(ApiResponse::success(entry, request_id, elapsed).with_link("transcripts", &link)))
}

/// GET /api/v1/live/transcripts/{id} - Chronological transcript page.
pub async fn list_transcripts(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(session_id): AppPath<String>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ApiResponse<Vec<TranscriptEntry>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let transcripts = state
        .session_service
        .list_transcripts(
            &session_id,
            &user.user_id,
            query.limit.unwrap_or(DEFAULT_TRANSCRIPT_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(transcripts, request_id, elapsed)
            .with_link("session", &format!("/api/v1/live/session/{session_id}")),
    ))
}

/// GET /api/v1/live/transcripts/{id}/recent - Last N turns, oldest first.
pub async fn recent_transcripts(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(session_id): AppPath<String>,
    AppQuery(query): AppQuery<RecentQuery>,
) -> Result<Json<ApiResponse<RecentTranscripts>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let transcripts = state
        .session_service
        .recent_transcripts(
            &session_id,
            &user.user_id,
            query.limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        )
        .await?;
    let formatted = ContextFormatter::format_transcript(&transcripts);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        RecentTranscripts {
            transcripts,
            formatted,
        },
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/live/transcripts/{id}/since/{timestamp} - Turns after `timestamp`.
pub async fn transcripts_since(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath((session_id, since)): AppPath<(String, i64)>,
) -> Result<Json<ApiResponse<Vec<TranscriptEntry>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let transcripts = state
        .session_service
        .transcripts_since(&session_id, &user.user_id, since)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(transcripts, request_id, elapsed)))
}

/// GET /api/v1/live/context/{id} - Summary, recent turns, and restoration prompt.
pub async fn get_context(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(session_id): AppPath<String>,
    AppQuery(query): AppQuery<ContextQuery>,
) -> Result<Json<ApiResponse<RestorationContext>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let context = state
        .session_service
        .restoration_context(
            &session_id,
            &user.user_id,
            query.transcript_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(context, request_id, elapsed)
            .with_link("session", &format!("/api/v1/live/session/{session_id}")),
    ))
}
