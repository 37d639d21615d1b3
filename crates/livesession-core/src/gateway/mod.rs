//! External model gateway abstractions.
//!
//! `ModelGateway` is the port for the third-party generative-AI API. It only
//! knows how to verify a key and list models; reshaping the listing for
//! clients is done by [`catalog`], and [`service::GatewayService`] ties both
//! to the current configuration.

pub mod catalog;
pub mod service;

use livesession_types::error::GatewayError;
use livesession_types::gateway::RawModel;
use secrecy::SecretString;

/// Port for the upstream model API.
///
/// Each call is a single bounded-timeout request; implementations do not retry.
pub trait ModelGateway: Send + Sync {
    /// Returns `Ok(true)` when the upstream accepts the key, `Ok(false)` when
    /// it answers with a non-success status.
    fn verify_api_key(
        &self,
        api_key: &SecretString,
    ) -> impl std::future::Future<Output = Result<bool, GatewayError>> + Send;

    /// Fetch the raw model list.
    fn list_models(
        &self,
        api_key: &SecretString,
    ) -> impl std::future::Future<Output = Result<Vec<RawModel>, GatewayError>> + Send;
}
