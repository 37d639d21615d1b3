use thiserror::Error;

/// Errors surfaced by live session operations.
///
/// Storage failures stay distinct from `NotFound` so callers can log and
/// report them differently.
#[derive(Debug, Error)]
pub enum LiveSessionError {
    #[error("session not found")]
    NotFound,

    #[error("session belongs to another user")]
    Forbidden,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for LiveSessionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => LiveSessionError::NotFound,
            other => LiveSessionError::Storage(other.to_string()),
        }
    }
}

/// Errors from repository operations (used by trait definitions in livesession-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the external model gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured")]
    NotConfigured,

    #[error("live mode is not enabled")]
    Disabled,

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: LiveSessionError = RepositoryError::NotFound.into();
        assert!(matches!(err, LiveSessionError::NotFound));
    }

    #[test]
    fn test_repository_failure_maps_to_storage() {
        let err: LiveSessionError = RepositoryError::Query("disk I/O error".to_string()).into();
        match err {
            LiveSessionError::Storage(msg) => assert!(msg.contains("disk I/O error")),
            other => panic!("expected storage error, got {other:?}"),
        }

        let err: LiveSessionError = RepositoryError::Connection.into();
        assert!(matches!(err, LiveSessionError::Storage(_)));
    }

    #[test]
    fn test_gateway_error_display() {
        assert_eq!(GatewayError::Status(403).to_string(), "upstream returned HTTP 403");
    }
}
