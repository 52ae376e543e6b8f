use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::IntentError;

/// Placeholder replaced by the TON input inside a user prompt template.
pub const TON_INPUT_PLACEHOLDER: &str = "{{TON_INPUT}}";

/// Settings for the chat-completion endpoint.
///
/// Built once at startup (typically from the YAML pipeline config plus an
/// API key read from the environment) and shared by reference.
///
/// # Example
/// ```
/// use intent::IntentConfig;
///
/// let cfg = IntentConfig {
///     api_key: "sk-test".into(),
///     ..Default::default()
/// };
/// assert_eq!(cfg.model, "gpt-4o-mini");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentConfig {
    /// Chat model name sent as `model`.
    pub model: String,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Bearer token. Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Sampling temperature for intent interpretation. Kept low so the same
    /// message maps to the same intent.
    pub temperature: f64,
    /// Overall HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: String::new(),
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

impl IntentConfig {
    pub fn validate(&self) -> Result<(), IntentError> {
        if self.api_key.trim().is_empty() {
            return Err(IntentError::InvalidConfig("api_key is required".into()));
        }
        if self.model.trim().is_empty() {
            return Err(IntentError::InvalidConfig("model must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(IntentError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(IntentError::InvalidConfig(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(IntentError::InvalidConfig("timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
