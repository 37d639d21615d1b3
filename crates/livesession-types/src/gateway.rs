//! Model descriptors exchanged with the Gemini REST API.
//!
//! `RawModel` mirrors one element of the upstream `GET /models` response
//! (camelCase). `ModelInfo` and `LiveModelInfo` are the reshaped forms
//! returned to clients.

use serde::{Deserialize, Serialize};

/// One model as listed by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModel {
    /// Resource name, e.g. `models/gemini-2.0-flash`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_token_limit: Option<u64>,
    #[serde(default)]
    pub output_token_limit: Option<u64>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Upstream `GET /models` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModelList {
    #[serde(default)]
    pub models: Vec<RawModel>,
}

/// A model as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub input_token_limit: u64,
    pub output_token_limit: u64,
    pub supports_live: bool,
}

/// A configured live-capable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveModelInfo {
    pub id: String,
    pub name: String,
    pub supports_live: bool,
}

/// Live model catalog offered to clients.
///
/// `voice` and `voices` are omitted when live mode is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveCatalog {
    pub models: Vec<LiveModelInfo>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voices: Option<Vec<String>>,
}

/// Credentials a client uses to open the realtime connection itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveCredentials {
    pub api_key: String,
    pub voice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_live_catalog_omits_voices() {
        let catalog = LiveCatalog {
            models: Vec::new(),
            enabled: false,
            voice: None,
            voices: None,
        };
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json, serde_json::json!({"models": [], "enabled": false}));
    }

    #[test]
    fn test_raw_model_list_parses_upstream_shape() {
        let body = r#"{
            "models": [
                {
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "inputTokenLimit": 1048576,
                    "outputTokenLimit": 8192,
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                { "name": "models/embedding-001" }
            ]
        }"#;
        let list: RawModelList = serde_json::from_str(body).unwrap();
        assert_eq!(list.models.len(), 2);
        assert_eq!(list.models[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
        assert_eq!(list.models[0].input_token_limit, Some(1_048_576));
        assert!(list.models[1].supported_generation_methods.is_empty());
    }

    #[test]
    fn test_missing_models_key_is_empty() {
        let list: RawModelList = serde_json::from_str("{}").unwrap();
        assert!(list.models.is_empty());
    }
}
