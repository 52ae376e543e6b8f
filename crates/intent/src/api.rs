//! Chat-completion transport.
//!
//! [`CompletionClient`] is the seam between interpretation and the network:
//! production code uses [`OpenAiClient`], tests substitute an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::IntentConfig;
use crate::error::IntentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// `{"type": "text"}`: asks for free text, which the TON decoder then reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn text() -> Self {
        Self { kind: "text".into() }
    }
}

/// Body of `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Anything that turns a [`CompletionRequest`] into the assistant's text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns `choices[0].message.content`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, IntentError>;
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// OpenAI-compatible HTTP client. Owns its connection pool; construct one
/// per process and share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &IntentConfig) -> Result<Self, IntentError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IntentError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(http, config))
    }

    /// Reuses an existing `reqwest::Client` (shared pool, custom TLS, ...).
    pub fn with_http_client(http: reqwest::Client, config: &IntentConfig) -> Self {
        Self {
            http,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, IntentError> {
        debug!(model = %request.model, messages = request.messages.len(), "completion_request");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| IntentError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IntentError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(status = status.as_u16(), error = %message, "completion_upstream_error");
            return Err(IntentError::Upstream {
                status: Some(status.as_u16()),
                message: format!("OpenAI API error: {message}"),
            });
        }

        extract_content(&body).map_err(|message| IntentError::Upstream {
            status: Some(status.as_u16()),
            message,
        })
    }
}

fn extract_content(body: &str) -> Result<String, String> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| format!("malformed completion response: {e}"))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| "completion response has no choices[0].message.content".to_string())
}
