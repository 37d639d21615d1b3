//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/live/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let live_routes = Router::new()
        .route("/health", get(handlers::health::health))
        // Sessions
        .route("/session", post(handlers::session::create_session))
        .route("/session/active", get(handlers::session::get_active_session))
        .route(
            "/session/{id}",
            get(handlers::session::get_session)
                .put(handlers::session::update_session)
                .delete(handlers::session::delete_session),
        )
        .route("/sessions", get(handlers::session::list_sessions))
        // Transcripts
        .route("/transcript", post(handlers::transcript::add_transcript))
        .route("/transcripts/{id}", get(handlers::transcript::list_transcripts))
        .route(
            "/transcripts/{id}/recent",
            get(handlers::transcript::recent_transcripts),
        )
        .route(
            "/transcripts/{id}/since/{timestamp}",
            get(handlers::transcript::transcripts_since),
        )
        .route("/context/{id}", get(handlers::transcript::get_context))
        // Gemini configuration and models
        .route("/config", get(handlers::gemini::get_config))
        .route("/config/update", post(handlers::gemini::update_config))
        .route("/config/user", get(handlers::gemini::get_user_config))
        .route("/verify", post(handlers::gemini::verify_api_key))
        .route("/models", get(handlers::gemini::list_models))
        .route("/models/live", get(handlers::gemini::list_live_models))
        .route("/api-key", get(handlers::gemini::get_live_credentials));

    Router::new()
        .nest("/api/v1/live", live_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use livesession_infra::config::load_global_config;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        _dir: TempDir,
    }

    impl TestApp {
        async fn new() -> Self {
            Self::with_config(None).await
        }

        async fn with_config(config_toml: Option<&str>) -> Self {
            Self::with_override(config_toml, None).await
        }

        /// State built from the temp dir's `config.toml` only; the process
        /// environment is never read.
        async fn with_override(config_toml: Option<&str>, api_key_override: Option<&str>) -> Self {
            let dir = TempDir::new().unwrap();
            if let Some(toml) = config_toml {
                tokio::fs::write(dir.path().join("config.toml"), toml).await.unwrap();
            }
            let config = load_global_config(dir.path()).await;
            let state = AppState::with_config(dir.path(), config, api_key_override.map(str::to_string))
                .await
                .unwrap();
            Self { state, _dir: dir }
        }

        async fn key(&self, user_id: &str, admin: bool) -> String {
            self.state.api_keys.create_key(user_id, "test", admin).await.unwrap()
        }

        async fn call(&self, method: Method, uri: &str, key: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(key) = key {
                builder = builder.header("authorization", format!("Bearer {key}"));
            }
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = build_router(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }
    }

    #[tokio::test]
    async fn test_health_needs_no_key() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/api/v1/live/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_or_unknown_key_is_unauthorized() {
        let app = TestApp::new().await;

        let (status, body) = app.call(Method::GET, "/api/v1/live/sessions", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errors"][0]["code"], "UNAUTHORIZED");

        let (status, _) = app
            .call(Method::GET, "/api/v1/live/sessions", Some("lsk_nope"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_append_and_restore_flow() {
        let app = TestApp::new().await;
        let key = app.key("alice", false).await;

        let (status, body) = app
            .call(Method::POST, "/api/v1/live/session", Some(&key), Some(json!({"voice": "Kore"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["voice"], "Kore");

        for (role, content) in [("user", "Where should we go in May?"), ("assistant", "Lisbon is lovely then.")] {
            let (status, _) = app
                .call(
                    Method::POST,
                    "/api/v1/live/transcript",
                    Some(&key),
                    Some(json!({"session_id": session_id, "role": role, "content": content})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = app
            .call(Method::GET, &format!("/api/v1/live/session/{session_id}"), Some(&key), None)
            .await;
        assert_eq!(body["data"]["message_count"], 2);

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/live/session/{session_id}"),
                Some(&key),
                Some(json!({"summary": "Planning a May trip"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["last_summary_at"].is_i64());

        let (status, body) = app
            .call(Method::GET, &format!("/api/v1/live/context/{session_id}"), Some(&key), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["transcript_count"], 2);
        let prompt = body["data"]["context_prompt"].as_str().unwrap();
        assert!(prompt.contains("PREVIOUS CONTEXT:\nPlanning a May trip"));
        assert!(prompt.contains("[USER]: Where should we go in May?\n[GEMINI]: Lisbon is lovely then."));

        let (_, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/live/transcripts/{session_id}/recent?limit=1"),
                Some(&key),
                None,
            )
            .await;
        assert_eq!(body["data"]["formatted"], "[GEMINI]: Lisbon is lovely then.");

        let (_, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/live/transcripts/{session_id}/since/0"),
                Some(&key),
                None,
            )
            .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = app.call(Method::GET, "/api/v1/live/session/active", Some(&key), None).await;
        assert_eq!(body["data"]["id"], session_id.as_str());

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/live/session/{session_id}"), Some(&key), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .call(Method::GET, &format!("/api/v1/live/transcripts/{session_id}"), Some(&key), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_users_get_forbidden_and_missing_is_not_found() {
        let app = TestApp::new().await;
        let alice = app.key("alice", false).await;
        let bob = app.key("bob", false).await;

        let (_, body) = app
            .call(Method::POST, "/api/v1/live/session", Some(&alice), Some(json!({})))
            .await;
        let session_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(Method::GET, &format!("/api/v1/live/session/{session_id}"), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["errors"][0]["code"], "FORBIDDEN");

        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/api/v1/live/session/{session_id}"),
                Some(&bob),
                Some(json!({"title": "mine now"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/live/transcript",
                Some(&bob),
                Some(json!({"session_id": session_id, "role": "user", "content": "hi"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, body) = app
            .call(Method::GET, &format!("/api/v1/live/session/{session_id}"), Some(&alice), None)
            .await;
        assert!(body["data"]["title"].is_null());
        assert_eq!(body["data"]["message_count"], 0);

        let (status, body) = app
            .call(Method::GET, "/api/v1/live/session/does-not-exist", Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_writes() {
        let app = TestApp::new().await;
        let key = app.key("alice", false).await;

        let (status, body) = app
            .call(Method::POST, "/api/v1/live/session", Some(&key), Some(json!({"voice": "Robot"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"][0]["message"].as_str().unwrap().starts_with("Invalid voice"));

        let (_, body) = app.call(Method::GET, "/api/v1/live/sessions", Some(&key), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let (_, body) = app
            .call(Method::POST, "/api/v1/live/session", Some(&key), Some(json!({})))
            .await;
        let session_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/api/v1/live/session/{session_id}"),
                Some(&key),
                Some(json!({"status": "paused"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call(
                Method::GET,
                &format!("/api/v1/live/transcripts/{session_id}?limit=-1"),
                Some(&key),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_config_endpoints_require_admin_and_validate_voice() {
        let app = TestApp::new().await;
        let user = app.key("alice", false).await;
        let admin = app.key("root", true).await;

        let (status, _) = app.call(Method::GET, "/api/v1/live/config", Some(&user), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/live/config/update",
                Some(&admin),
                Some(json!({"live_voice": "Robot"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/live/config/update",
                Some(&admin),
                Some(json!({"api_keys": ["AIza-test"], "live_enabled": true, "live_voice": "Fenrir"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["live_voice"], "Fenrir");
        assert!(app.state.data_dir.join("config.toml").exists());

        let (_, body) = app.call(Method::GET, "/api/v1/live/config/user", Some(&user), None).await;
        assert_eq!(body["data"]["enabled"], true);
        assert_eq!(body["data"]["voice"], "Fenrir");

        let (status, body) = app.call(Method::GET, "/api/v1/live/api-key", Some(&user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["api_key"], "AIza-test");
        assert_eq!(body["data"]["voice"], "Fenrir");
    }

    #[tokio::test]
    async fn test_live_endpoints_when_disabled() {
        let app = TestApp::new().await;
        let key = app.key("alice", false).await;

        let (status, body) = app.call(Method::GET, "/api/v1/live/api-key", Some(&key), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["errors"][0]["code"], "LIVE_DISABLED");

        let (status, body) = app.call(Method::GET, "/api/v1/live/models/live", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"models": [], "enabled": false}));

        let (status, body) = app.call(Method::GET, "/api/v1/live/models", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_maps_upstream_answers() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "good-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{
                    "name": "models/gemini-2.0-flash-live-001",
                    "supportedGenerationMethods": ["bidiGenerateContent"]
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "bad-key"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let app = TestApp::with_config(Some(&format!(
            "[gemini]\napi_base_url = \"{}\"\napi_keys = [\"good-key\"]\n",
            server.uri()
        )))
        .await;
        let admin = app.key("root", true).await;

        let (status, body) = app.call(Method::POST, "/api/v1/live/verify", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["valid"], true);

        let (_, body) = app.call(Method::GET, "/api/v1/live/models", Some(&admin), None).await;
        assert_eq!(body["data"][0]["id"], "gemini-2.0-flash-live-001");
        assert_eq!(body["data"][0]["supports_live"], true);

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/live/config/update",
                Some(&admin),
                Some(json!({"api_keys": ["bad-key"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.call(Method::POST, "/api/v1/live/verify", Some(&admin), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .call(Method::POST, "/api/v1/live/config/update", Some(&admin), Some(json!({"api_keys": []})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.call(Method::POST, "/api/v1/live/verify", Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "API_KEY_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_environment_key_is_applied_but_never_saved() {
        let app = TestApp::with_override(
            Some("[gemini]\napi_keys = [\"file-key\"]\nlive_enabled = true\n"),
            Some("env-key"),
        )
        .await;
        let user = app.key("alice", false).await;
        let admin = app.key("root", true).await;

        let (status, body) = app.call(Method::GET, "/api/v1/live/api-key", Some(&user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["api_key"], "env-key");

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/live/config/update",
                Some(&admin),
                Some(json!({"api_keys": ["admin-key"], "live_voice": "Kore"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["api_keys"], json!(["env-key"]));

        let saved = load_global_config(&app.state.data_dir).await;
        assert_eq!(saved.gemini.api_keys, vec!["admin-key".to_string()]);
        assert_eq!(saved.gemini.live_voice, "Kore");
        let raw = tokio::fs::read_to_string(app.state.data_dir.join("config.toml"))
            .await
            .unwrap();
        assert!(!raw.contains("env-key"));

        let (_, body) = app.call(Method::GET, "/api/v1/live/api-key", Some(&user), None).await;
        assert_eq!(body["data"]["api_key"], "env-key");
    }

    #[tokio::test]
    async fn test_malformed_input_uses_error_envelope() {
        let app = TestApp::new().await;
        let key = app.key("alice", false).await;

        let (_, body) = app
            .call(Method::POST, "/api/v1/live/session", Some(&key), Some(json!({})))
            .await;
        let session_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/live/transcripts/{session_id}/since/yesterday"),
                Some(&key),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/live/transcript",
                Some(&key),
                Some(json!({"session_id": session_id, "content": "no role"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/live/transcripts/{session_id}?limit=ten"),
                Some(&key),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (_, body) = app
            .call(Method::GET, &format!("/api/v1/live/session/{session_id}"), Some(&key), None)
            .await;
        assert_eq!(body["data"]["message_count"], 0);
    }
}
