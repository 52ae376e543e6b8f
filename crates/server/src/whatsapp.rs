//! WhatsApp Cloud API sender.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tonbot::{ConfigLoadError, WhatsAppYamlConfig};
use tracing::{debug, warn};

const TEMPLATE_LANGUAGE: &str = "es";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhatsAppError {
    /// Graph API answered with a non-success status.
    #[error("WhatsApp API error: {0}")]
    Api(String),
    #[error("WhatsApp request failed: {0}")]
    Transport(String),
    #[error("invalid recipient {0:?}")]
    InvalidRecipient(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SendReceipt {
    /// `wamid...` of the accepted message, when the API returned one.
    pub message_id: Option<String>,
}

/// Outbound message channel. [`WhatsAppClient`] is the production
/// implementation.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text_message(&self, to: &str, body: &str) -> Result<SendReceipt, WhatsAppError>;

    async fn send_template_message(
        &self,
        to: &str,
        template_name: &str,
        params: &[String],
    ) -> Result<SendReceipt, WhatsAppError>;
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub phone_number_id: String,
    pub access_token: String,
    pub api_version: String,
    pub graph_base_url: String,
    pub timeout: Duration,
}

impl WhatsAppConfig {
    /// Resolves the access token named by the YAML section from the
    /// environment.
    pub fn from_yaml(section: &WhatsAppYamlConfig) -> Result<Self, ConfigLoadError> {
        Ok(Self {
            phone_number_id: section.phone_number_id.clone(),
            access_token: section.access_token()?,
            api_version: section.api_version.clone(),
            graph_base_url: section.graph_base_url.clone(),
            timeout: Duration::from_secs(30),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.graph_base_url.trim_end_matches('/'),
            self.api_version,
            self.phone_number_id
        )
    }
}

#[derive(Deserialize)]
struct GraphResponse {
    error: Option<GraphError>,
    #[serde(default)]
    messages: Vec<GraphMessage>,
}

#[derive(Deserialize)]
struct GraphError {
    message: Option<String>,
}

#[derive(Deserialize)]
struct GraphMessage {
    id: Option<String>,
}

/// Client for `POST {graph}/{version}/{phone_number_id}/messages`.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    url: String,
    access_token: String,
}

impl WhatsAppClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WhatsAppError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: config.messages_url(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, body: Value) -> Result<SendReceipt, WhatsAppError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| WhatsAppError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WhatsAppError::Transport(e.to_string()))?;
        let parsed: Option<GraphResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Failed to send message".to_string());
            warn!(status = status.as_u16(), error = %message, "whatsapp_send_failed");
            return Err(WhatsAppError::Api(message));
        }

        let message_id = parsed
            .and_then(|r| r.messages.into_iter().next())
            .and_then(|m| m.id);
        debug!(message_id = ?message_id, "whatsapp_sent");
        Ok(SendReceipt { message_id })
    }
}

fn recipient(to: &str) -> Result<String, WhatsAppError> {
    if !canonical::is_valid_whatsapp_number(to) {
        return Err(WhatsAppError::InvalidRecipient(to.to_string()));
    }
    Ok(canonical::digits_only(to))
}

pub(crate) fn text_message_body(to: &str, body: &str) -> Value {
    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to,
        "type": "text",
        "text": {
            "preview_url": false,
            "body": body,
        }
    })
}

pub(crate) fn template_message_body(to: &str, template_name: &str, params: &[String]) -> Value {
    let mut template = json!({
        "name": template_name,
        "language": { "code": TEMPLATE_LANGUAGE },
    });
    if !params.is_empty() {
        let parameters: Vec<Value> = params
            .iter()
            .map(|param| json!({ "type": "text", "text": param }))
            .collect();
        template["components"] = json!([{ "type": "body", "parameters": parameters }]);
    }
    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to,
        "type": "template",
        "template": template,
    })
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text_message(&self, to: &str, body: &str) -> Result<SendReceipt, WhatsAppError> {
        let to = recipient(to)?;
        self.post(text_message_body(&to, body)).await
    }

    async fn send_template_message(
        &self,
        to: &str,
        template_name: &str,
        params: &[String],
    ) -> Result<SendReceipt, WhatsAppError> {
        let to = recipient(to)?;
        self.post(template_message_body(&to, template_name, params)).await
    }
}
