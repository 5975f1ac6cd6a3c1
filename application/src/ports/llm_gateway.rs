//! LLM Gateway port
//!
//! Defines the interface for communicating with the hosted LLM provider.
//! The provider is stateless from our point of view: every completion call
//! carries the system prompt, the replayed transcript, and the new message.

use async_trait::async_trait;
use parley_domain::{ModelId, ModelInfo, Turn};
use thiserror::Error;

/// Errors that can occur during provider calls
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The credential was rejected (HTTP 401 equivalent).
    #[error("credential rejected by provider")]
    Unauthorized,

    /// The provider is throttling this credential (HTTP 429 equivalent).
    #[error("rate limited by provider")]
    RateLimited,

    /// Any other non-success provider response.
    #[error("provider error: {0}")]
    Provider(String),

    /// Transport-level failure before a response was received.
    #[error("connection error: {0}")]
    Network(String),

    /// The call exceeded its deadline.
    #[error("provider call timed out")]
    Timeout,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer reaches the provider.
/// Implementations (adapters) live in the infrastructure layer. The
/// `api_key` parameter is plaintext for exactly the duration of the call;
/// implementations must not log or retain it.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one completion: system prompt, prior transcript, new user
    /// message. Returns the assistant reply text.
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[Turn],
        message: &str,
        api_key: &str,
        model: &ModelId,
    ) -> Result<String, GatewayError>;

    /// List the models the provider offers to this credential, unfiltered.
    ///
    /// Implementations must bound this call with a short timeout; it doubles
    /// as the cheap probe used for credential validation.
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, GatewayError>;
}
