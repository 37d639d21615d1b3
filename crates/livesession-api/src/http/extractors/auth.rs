//! API key authentication extractors.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against the `api_keys` table. A key
//! resolves to the user id it was minted for; that id is the owner used for
//! every session check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;
use crate::state::AppState;

/// The caller resolved from a valid API key.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub is_admin: bool,
}

/// A caller whose key carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;

        let record = state
            .api_keys
            .find_by_key(&api_key)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
                )
            })?;

        // Best effort, don't fail the request
        if let Err(e) = state.api_keys.touch(&record.id).await {
            tracing::debug!(error = %e, "Failed to update API key last_used_at");
        }

        Ok(CurrentUser {
            user_id: record.user_id,
            is_admin: record.is_admin,
        })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_header_is_preferred() {
        let parts = parts_with("authorization", "Bearer lsk_abc ");
        assert_eq!(extract_api_key(&parts).unwrap(), "lsk_abc");
    }

    #[test]
    fn test_x_api_key_header_is_accepted() {
        let parts = parts_with("x-api-key", "lsk_def");
        assert_eq!(extract_api_key(&parts).unwrap(), "lsk_def");
    }

    #[test]
    fn test_missing_key_is_unauthorized() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(extract_api_key(&parts), Err(AppError::Unauthorized(_))));

        let parts = parts_with("authorization", "Basic dXNlcjpwYXNz");
        assert!(matches!(extract_api_key(&parts), Err(AppError::Unauthorized(_))));
    }
}
