//! Groq gateway adapter - OpenAI-compatible REST implementation.
//!
//! Implements the [`LlmGateway`] port against Groq's OpenAI-compatible
//! API. Every completion call carries the whole prompt (system instruction
//! plus replayed transcript plus new message); the provider holds no
//! session state. The API key travels only in the `Authorization` header
//! and never appears in logs or error strings.

use async_trait::async_trait;
use parley_application::ports::llm_gateway::{GatewayError, LlmGateway};
use parley_domain::{ModelId, ModelInfo, Turn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model listing and validation probes must not hang.
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of an error body to keep in a provider error string.
const BODY_EXCERPT: usize = 200;

/// Gateway implementation that talks to the Groq HTTP API.
#[derive(Clone)]
pub struct GroqGateway {
    client: Client,
    base_url: String,
    list_timeout: Duration,
}

impl GroqGateway {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the gateway at a different OpenAI-compatible root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            list_timeout: LIST_TIMEOUT,
        }
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }
}

impl Default for GroqGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for GroqGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[Turn],
        message: &str,
        api_key: &str,
        model: &ModelId,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: model.as_str(),
            messages: build_messages(system_prompt, transcript, message),
        };
        debug!(
            model = %model,
            messages = request.messages.len(),
            "groq chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, &body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("malformed response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Provider("empty response".to_string()))
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.list_timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, &body));
        }

        let listing: ModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("malformed response: {}", e)))?;

        Ok(listing
            .data
            .into_iter()
            .map(|m| ModelInfo::from_provider(m.id, None, m.context_window, m.owned_by))
            .collect())
    }
}

/// Assemble the wire messages: system instruction, replayed transcript,
/// then the new user message.
fn build_messages<'a>(
    system_prompt: &'a str,
    transcript: &'a [Turn],
    message: &'a str,
) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(transcript.len() + 2);
    messages.push(WireMessage {
        role: "system",
        content: system_prompt,
    });
    for turn in transcript {
        messages.push(WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        });
    }
    messages.push(WireMessage {
        role: "user",
        content: message,
    });
    messages
}

fn map_error_status(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
        _ => {
            let excerpt = parley_domain::truncate_str(body, BODY_EXCERPT);
            GatewayError::Provider(format!("{}: {}", status.as_u16(), excerpt.trim()))
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        // reqwest error strings carry the URL at most, never headers
        GatewayError::Network(error.to_string())
    }
}

// ==================== Wire Types ====================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<WireModel>,
}

#[derive(Deserialize)]
struct WireModel {
    id: String,
    #[serde(default)]
    context_window: Option<u32>,
    #[serde(default)]
    owned_by: Option<String>,
}
