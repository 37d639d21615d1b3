//! Gemini configuration and model gateway handlers.
//!
//! Endpoints:
//! - GET  /api/v1/live/config        - Full Gemini settings (admin)
//! - POST /api/v1/live/config/update - Change keys, enabled flag, voice (admin)
//! - GET  /api/v1/live/config/user   - What a client needs to offer live mode
//! - POST /api/v1/live/verify        - Check the configured key upstream (admin)
//! - GET  /api/v1/live/models        - Reshaped upstream model catalog
//! - GET  /api/v1/live/models/live   - Configured live models
//! - GET  /api/v1/live/api-key       - Key and voice for the client-side connection

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use livesession_core::gateway::service::{live_credentials, live_models};
use livesession_infra::config::save_global_config;
use livesession_types::config::GeminiConfig;
use livesession_types::gateway::{LiveCatalog, LiveCredentials, ModelInfo};

use crate::http::error::AppError;
use crate::http::extractors::auth::{AdminUser, CurrentUser};
use crate::http::extractors::input::AppJson;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /config/update`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct ConfigUpdateRequest {
    pub api_keys: Option<Vec<String>>,
    pub live_enabled: Option<bool>,
    pub live_voice: Option<String>,
}

/// Live-mode settings visible to any authenticated user.
#[derive(Debug, Serialize)]
pub struct UserConfig {
    pub enabled: bool,
    pub voice: String,
    pub voices: Vec<String>,
    pub live_models: Vec<String>,
}

/// GET /api/v1/live/config - Full Gemini configuration.
pub async fn get_config(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<GeminiConfig>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let gemini = state.gemini_config().await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(gemini, request_id, elapsed)))
}

/// POST /api/v1/live/config/update - Apply and persist a config change.
///
/// Only the file's own settings are saved; an environment key is never written.
pub async fn update_config(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(body): AppJson<ConfigUpdateRequest>,
) -> Result<Json<ApiResponse<GeminiConfig>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mut config = state.config.write().await;

    if let Some(voice) = body.live_voice.as_deref() {
        if !config.gemini.is_supported_voice(voice) {
            return Err(AppError::Validation(format!(
                "Invalid voice. Must be one of: {}",
                config.gemini.live_voices.join(", ")
            )));
        }
    }

    let mut updated = config.clone();
    if let Some(api_keys) = body.api_keys {
        updated.gemini.api_keys = api_keys;
    }
    if let Some(enabled) = body.live_enabled {
        updated.gemini.live_enabled = enabled;
    }
    if let Some(voice) = body.live_voice {
        updated.gemini.live_voice = voice;
    }

    save_global_config(&state.data_dir, &updated)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save config: {e:#}")))?;
    *config = updated;

    tracing::info!(
        by = %admin.user_id,
        live_enabled = config.gemini.live_enabled,
        voice = %config.gemini.live_voice,
        "Gemini configuration updated"
    );
    if state.api_key_override.is_some() {
        tracing::warn!("GEMINI_API_KEY is set and takes precedence over the saved key list");
    }
    drop(config);

    let gemini = state.gemini_config().await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(gemini, request_id, elapsed)))
}

/// GET /api/v1/live/config/user - Live-mode availability for clients.
pub async fn get_user_config(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<UserConfig>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let gemini = state.gemini_config().await;
    let user_config = UserConfig {
        enabled: gemini.live_available(),
        voice: gemini.live_voice,
        voices: gemini.live_voices,
        live_models: gemini.live_models,
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(user_config, request_id, elapsed)))
}

/// POST /api/v1/live/verify - Check the configured key against the upstream API.
///
/// 400 when no key is configured, 401 when the upstream rejects it.
pub async fn verify_api_key(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let gemini = state.gemini_config().await;
    if !state.gateway_service.verify(&gemini).await? {
        return Err(AppError::Unauthorized("Invalid Gemini API key".to_string()));
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "valid": true }),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/live/models - Models the configured key can use.
///
/// Empty when no key is configured or the upstream call fails.
pub async fn list_models(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ModelInfo>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let gemini = state.gemini_config().await;
    let models = state.gateway_service.models(&gemini).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(models, request_id, elapsed)))
}

/// GET /api/v1/live/models/live - Configured live models with voice options.
pub async fn list_live_models(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<LiveCatalog>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let catalog = live_models(&state.gemini_config().await);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(catalog, request_id, elapsed)))
}

/// GET /api/v1/live/api-key - Credentials for opening the realtime connection.
///
/// 403 when live mode is disabled, 400 when no key is configured.
pub async fn get_live_credentials(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<LiveCredentials>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let credentials = live_credentials(&state.gemini_config().await)?;
    tracing::debug!(user_id = %user.user_id, "Issued live credentials");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(credentials, request_id, elapsed)))
}
