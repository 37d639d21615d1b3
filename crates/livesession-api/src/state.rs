//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/gateway traits, but AppState pins them
//! to the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use livesession_core::gateway::service::GatewayService;
use livesession_core::session::service::LiveSessionService;
use livesession_infra::config::{
    GEMINI_API_KEY_ENV, api_key_override_from_env, apply_api_key_override, load_global_config,
    resolve_data_dir,
};
use livesession_infra::gateway::gemini::GeminiGateway;
use livesession_infra::sqlite::api_key::SqliteApiKeyStore;
use livesession_infra::sqlite::live::SqliteLiveRepository;
use livesession_infra::sqlite::pool::DatabasePool;
use livesession_types::config::{GeminiConfig, GlobalConfig};
use tokio::sync::RwLock;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSessionService = LiveSessionService<SqliteLiveRepository>;

pub type ConcreteGatewayService = GatewayService<GeminiGateway>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub gateway_service: Arc<ConcreteGatewayService>,
    pub api_keys: SqliteApiKeyStore,
    /// Settings as stored in `config.toml`; mutable through the admin endpoints.
    pub config: Arc<RwLock<GlobalConfig>>,
    /// `GEMINI_API_KEY`, applied on read and never written back to disk.
    pub api_key_override: Option<String>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, load config, wire services.
    ///
    /// The only place the process environment is consulted.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_global_config(&data_dir).await;
        let api_key_override = api_key_override_from_env();
        if api_key_override.is_some() {
            tracing::debug!("Using Gemini API key from {GEMINI_API_KEY_ENV}");
        }
        Self::with_config(&data_dir, config, api_key_override).await
    }

    /// Build state from an explicit data directory and file configuration.
    pub async fn with_config(
        data_dir: &Path,
        config: GlobalConfig,
        api_key_override: Option<String>,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("livesession.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let gateway = GeminiGateway::from_config(&config.gemini)?;

        tracing::debug!(data_dir = %data_dir.display(), "Application state initialized");

        Ok(Self {
            session_service: Arc::new(LiveSessionService::new(SqliteLiveRepository::new(
                db_pool.clone(),
            ))),
            gateway_service: Arc::new(GatewayService::new(gateway)),
            api_keys: SqliteApiKeyStore::new(db_pool.clone()),
            config: Arc::new(RwLock::new(config)),
            api_key_override,
            data_dir: data_dir.to_path_buf(),
            db_pool,
        })
    }

    /// Snapshot of the effective `[gemini]` settings, environment key applied.
    pub async fn gemini_config(&self) -> GeminiConfig {
        let config = self.config.read().await.clone();
        apply_api_key_override(config, self.api_key_override.clone()).gemini
    }
}
