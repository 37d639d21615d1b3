//! Global configuration loader for livesession.
//!
//! Reads `config.toml` from the data directory (`~/.livesession/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use anyhow::Context;
use livesession_types::config::GlobalConfig;

/// Environment variable that replaces the configured Gemini key list.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Resolve the data directory.
///
/// Priority: `LIVESESSION_DATA_DIR` env var, then `~/.livesession`, then
/// `.livesession` in the current directory.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LIVESESSION_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".livesession");
    }

    PathBuf::from(".livesession")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Read the `GEMINI_API_KEY` override, ignoring blank values.
pub fn api_key_override_from_env() -> Option<String> {
    std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// Replace the key list with `key` when it is present and non-blank.
pub fn apply_api_key_override(mut config: GlobalConfig, key: Option<String>) -> GlobalConfig {
    if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
        config.gemini.api_keys = vec![key];
    }
    config
}

/// Write `config` to `{data_dir}/config.toml`, creating the directory if needed.
pub async fn save_global_config(data_dir: &Path, config: &GlobalConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    let config_path = data_dir.join("config.toml");
    tokio::fs::write(&config_path, content)
        .await
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    tracing::info!(path = %config_path.display(), "Configuration saved");
    Ok(())
}
