//! Application error type mapping to HTTP status codes and envelope format.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use livesession_types::error::{GatewayError, LiveSessionError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session and transcript errors.
    Session(LiveSessionError),
    /// Upstream model API errors.
    Gateway(GatewayError),
    /// Authentication failure.
    Unauthorized(String),
    /// Authenticated, but not allowed.
    Forbidden(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<LiveSessionError> for AppError {
    fn from(e: LiveSessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Gateway(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(LiveSessionError::NotFound) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found".to_string())
            }
            AppError::Session(LiveSessionError::Forbidden) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied".to_string())
            }
            AppError::Session(LiveSessionError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Session(LiveSessionError::Storage(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg.clone())
            }
            AppError::Gateway(GatewayError::NotConfigured) => (
                StatusCode::BAD_REQUEST,
                "API_KEY_NOT_CONFIGURED",
                "Gemini API key not configured".to_string(),
            ),
            AppError::Gateway(GatewayError::Disabled) => (
                StatusCode::FORBIDDEN,
                "LIVE_DISABLED",
                "Gemini Live is not enabled".to_string(),
            ),
            AppError::Gateway(e) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        (status, axum::Json(body)).into_response()
    }
}
