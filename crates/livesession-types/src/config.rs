//! Global configuration types for livesession.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! Gemini gateway: API keys, whether live mode is enabled, and the voice and
//! model catalogs offered to clients.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.livesession/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gemini gateway and live-mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the Gemini REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API keys; only the first one is used.
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Whether clients may open live (realtime) sessions.
    #[serde(default)]
    pub live_enabled: bool,

    /// Voice used for live sessions.
    #[serde(default = "default_live_voice")]
    pub live_voice: String,

    /// Voices a client may select.
    #[serde(default = "default_live_voices")]
    pub live_voices: Vec<String>,

    /// Model ids known to support the bidirectional live API.
    #[serde(default = "default_live_models")]
    pub live_models: Vec<String>,

    /// Total timeout for gateway requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_live_voice() -> String {
    "Puck".to_string()
}

fn default_live_voices() -> Vec<String> {
    ["Puck", "Charon", "Kore", "Fenrir", "Aoede", "Leda", "Orus", "Zephyr"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_live_models() -> Vec<String> {
    [
        "gemini-2.0-flash-live-001",
        "gemini-live-2.5-flash-preview",
        "gemini-2.5-flash-native-audio-preview-09-2025",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_keys: Vec::new(),
            live_enabled: false,
            live_voice: default_live_voice(),
            live_voices: default_live_voices(),
            live_models: default_live_models(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// The key used for gateway calls: the first configured key, if non-empty.
    pub fn primary_api_key(&self) -> Option<&str> {
        self.api_keys
            .first()
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Live mode is usable only when enabled and a key is configured.
    pub fn live_available(&self) -> bool {
        self.live_enabled && self.primary_api_key().is_some()
    }

    pub fn is_supported_voice(&self, voice: &str) -> bool {
        self.live_voices.iter().any(|v| v == voice)
    }
}
