//! Gateway service combining the upstream API with the live configuration.

use livesession_types::config::GeminiConfig;
use livesession_types::error::GatewayError;
use livesession_types::gateway::{LiveCatalog, LiveCredentials, ModelInfo};
use secrecy::SecretString;
use tracing::{info, warn};

use super::ModelGateway;
use super::catalog::{build_catalog, live_catalog};

/// Answers model and configuration questions for clients.
///
/// Configuration is passed per call because an admin may change it at
/// runtime.
pub struct GatewayService<G: ModelGateway> {
    gateway: G,
}

impl<G: ModelGateway> GatewayService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Check the configured key against the upstream API.
    ///
    /// `Ok(false)` means the upstream rejected the key.
    pub async fn verify(&self, gemini: &GeminiConfig) -> Result<bool, GatewayError> {
        let key = primary_key(gemini)?;
        let valid = self.gateway.verify_api_key(&key).await?;
        if valid {
            info!("Gemini API key verified");
        } else {
            warn!("Gemini API key was rejected");
        }
        Ok(valid)
    }

    /// The reshaped model catalog.
    ///
    /// Empty when no key is configured or the upstream call fails.
    pub async fn models(&self, gemini: &GeminiConfig) -> Vec<ModelInfo> {
        let Ok(key) = primary_key(gemini) else {
            return Vec::new();
        };

        match self.gateway.list_models(&key).await {
            Ok(raw) => build_catalog(&raw, &gemini.live_models),
            Err(e) => {
                warn!(error = %e, "Failed to fetch Gemini models");
                Vec::new()
            }
        }
    }
}

/// Configured live models; empty and disabled unless live mode is available.
pub fn live_models(gemini: &GeminiConfig) -> LiveCatalog {
    if !gemini.live_available() {
        return LiveCatalog {
            models: Vec::new(),
            enabled: false,
            voice: None,
            voices: None,
        };
    }

    LiveCatalog {
        models: live_catalog(&gemini.live_models),
        enabled: true,
        voice: Some(gemini.live_voice.clone()),
        voices: Some(gemini.live_voices.clone()),
    }
}

/// The key and voice a client needs to open the realtime connection.
pub fn live_credentials(gemini: &GeminiConfig) -> Result<LiveCredentials, GatewayError> {
    if !gemini.live_enabled {
        return Err(GatewayError::Disabled);
    }
    let api_key = gemini
        .primary_api_key()
        .ok_or(GatewayError::NotConfigured)?;

    Ok(LiveCredentials {
        api_key: api_key.to_string(),
        voice: gemini.live_voice.clone(),
    })
}

fn primary_key(gemini: &GeminiConfig) -> Result<SecretString, GatewayError> {
    gemini
        .primary_api_key()
        .map(|k| SecretString::from(k.to_string()))
        .ok_or(GatewayError::NotConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use livesession_types::gateway::RawModel;
    use secrecy::ExposeSecret;

    /// Gateway that accepts exactly one key and serves a fixed list.
    struct FakeGateway {
        valid_key: &'static str,
        fail: bool,
    }

    impl ModelGateway for FakeGateway {
        async fn verify_api_key(&self, api_key: &SecretString) -> Result<bool, GatewayError> {
            if self.fail {
                return Err(GatewayError::Http("connection refused".to_string()));
            }
            Ok(api_key.expose_secret() == self.valid_key)
        }

        async fn list_models(&self, _api_key: &SecretString) -> Result<Vec<RawModel>, GatewayError> {
            if self.fail {
                return Err(GatewayError::Status(500));
            }
            Ok(vec![
                RawModel {
                    name: "models/gemini-2.0-flash-live-001".to_string(),
                    ..Default::default()
                },
                RawModel {
                    name: "models/text-embedding-004".to_string(),
                    supported_generation_methods: vec!["embedContent".to_string()],
                    ..Default::default()
                },
            ])
        }
    }

    fn config_with_key(key: &str) -> GeminiConfig {
        GeminiConfig {
            api_keys: vec![key.to_string()],
            live_enabled: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_verify_without_key_is_not_configured() {
        let svc = GatewayService::new(FakeGateway { valid_key: "good", fail: false });
        let err = svc.verify(&GeminiConfig::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn test_verify_reports_validity() {
        let svc = GatewayService::new(FakeGateway { valid_key: "good", fail: false });
        assert!(svc.verify(&config_with_key("good")).await.unwrap());
        assert!(!svc.verify(&config_with_key("bad")).await.unwrap());
    }

    #[tokio::test]
    async fn test_models_filters_and_flags_live() {
        let svc = GatewayService::new(FakeGateway { valid_key: "good", fail: false });
        let models = svc.models(&config_with_key("good")).await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "gemini-2.0-flash-live-001");
        assert!(models[0].supports_live);
    }

    #[tokio::test]
    async fn test_models_empty_on_failure_or_missing_key() {
        let failing = GatewayService::new(FakeGateway { valid_key: "good", fail: true });
        assert!(failing.models(&config_with_key("good")).await.is_empty());

        let svc = GatewayService::new(FakeGateway { valid_key: "good", fail: false });
        assert!(svc.models(&GeminiConfig::default()).await.is_empty());
    }

    #[test]
    fn test_live_models_requires_enabled_and_key() {
        let disabled = GeminiConfig {
            live_enabled: false,
            ..config_with_key("good")
        };
        let catalog = live_models(&disabled);
        assert!(!catalog.enabled);
        assert!(catalog.models.is_empty());

        let keyless = GeminiConfig {
            live_enabled: true,
            ..Default::default()
        };
        assert!(!live_models(&keyless).enabled);

        let catalog = live_models(&config_with_key("good"));
        assert!(catalog.enabled);
        assert_eq!(catalog.voice.as_deref(), Some("Puck"));
        assert_eq!(catalog.models.len(), GeminiConfig::default().live_models.len());
    }

    #[test]
    fn test_live_credentials() {
        let disabled = GeminiConfig {
            live_enabled: false,
            ..config_with_key("good")
        };
        assert!(matches!(live_credentials(&disabled), Err(GatewayError::Disabled)));

        let keyless = GeminiConfig {
            live_enabled: true,
            ..Default::default()
        };
        assert!(matches!(live_credentials(&keyless), Err(GatewayError::NotConfigured)));

        let creds = live_credentials(&config_with_key("good")).unwrap();
        assert_eq!(creds.api_key, "good");
        assert_eq!(creds.voice, "Puck");
    }
}
