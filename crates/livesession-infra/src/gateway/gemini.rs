//! GeminiGateway -- concrete [`ModelGateway`] for the Gemini REST API.
//!
//! Both operations are a single `GET {base}/models?key=...` with the total
//! timeout taken from configuration. The API key is wrapped in
//! [`secrecy::SecretString`] and only exposed when building the query string.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, info_span};

use livesession_core::gateway::ModelGateway;
use livesession_types::config::GeminiConfig;
use livesession_types::error::GatewayError;
use livesession_types::gateway::{RawModel, RawModelList};

/// Gemini REST client.
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiGateway {
    /// Create a gateway for `base_url` with a total per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a gateway from the `[gemini]` configuration section.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn get_models(&self, api_key: &SecretString) -> Result<reqwest::Response, GatewayError> {
        self.client
            .get(format!("{}/models", self.base_url))
            .query(&[("key", api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| GatewayError::Http(format!("HTTP request failed: {}", e.without_url())))
    }
}

impl ModelGateway for GeminiGateway {
    async fn verify_api_key(&self, api_key: &SecretString) -> Result<bool, GatewayError> {
        let span = info_span!("gen_ai.verify_key", gen_ai.system = "gemini");
        async {
            let response = self.get_models(api_key).await?;
            let status = response.status();
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), "Gemini rejected API key");
            }
            Ok(status.is_success())
        }
        .instrument(span)
        .await
    }

    async fn list_models(&self, api_key: &SecretString) -> Result<Vec<RawModel>, GatewayError> {
        let span = info_span!("gen_ai.list_models", gen_ai.system = "gemini");
        async {
            let response = self.get_models(api_key).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(GatewayError::Status(status.as_u16()));
            }

            let list: RawModelList = response.json().await.map_err(|e| {
                GatewayError::Deserialization(format!("failed to parse model list: {e}"))
            })?;
            tracing::debug!(count = list.models.len(), "Fetched Gemini models");
            Ok(list.models)
        }
        .instrument(span)
        .await
    }
}
