//! YAML configuration for the tonbot pipeline.
//!
//! One file describes the model endpoint, the WhatsApp sender and the user
//! prompt template. Secrets never live in the file: it names the
//! environment variables that hold them, and they are read when the
//! section is resolved.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "tienda-demo"
//!
//! ai:
//!   model: "gpt-4o-mini"
//!   base_url: "https://api.openai.com/v1"
//!   api_key_env: "OPENAI_API_KEY"
//!   temperature: 0.3
//!   timeout_secs: 30
//!
//! whatsapp:
//!   phone_number_id: "123456789012345"
//!   api_version: "v21.0"
//!   access_token_env: "WHATSAPP_ACCESS_TOKEN"
//!
//! prompt:
//!   default_plan: "basic"
//!   template: |
//!     Mensaje del cliente en formato TON:
//!     {{TON_INPUT}}
//! ```

use std::fs;
use std::path::Path;

use intent::{IntentConfig, Plan, TON_INPUT_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or resolving the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("environment variable {0} is not set")]
    MissingSecret(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TonbotConfig {
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Model endpoint. Without it the server stores messages but never
    /// interprets or answers them.
    #[serde(default)]
    pub ai: Option<AiYamlConfig>,

    /// Outbound sender. Without it replies are computed but not sent.
    #[serde(default)]
    pub whatsapp: Option<WhatsAppYamlConfig>,

    #[serde(default)]
    pub prompt: PromptYamlConfig,
}

impl TonbotConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: TonbotConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if let Some(ai) = &self.ai {
            ai.validate()?;
        }
        if let Some(whatsapp) = &self.whatsapp {
            whatsapp.validate()?;
        }
        self.prompt.validate()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for TonbotConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ai: None,
            whatsapp: None,
            prompt: PromptYamlConfig::default(),
        }
    }
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiYamlConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiYamlConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_ai_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.model.trim().is_empty() {
            return Err(ConfigLoadError::Validation("ai.model must not be empty".into()));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigLoadError::Validation("ai.api_key_env must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigLoadError::Validation(format!(
                "ai.temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigLoadError::Validation("ai.timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Resolves the API key from the process environment.
    pub fn to_intent_config(&self) -> Result<IntentConfig, ConfigLoadError> {
        self.to_intent_config_with(|name| std::env::var(name).ok())
    }

    /// Resolves the API key through `lookup` instead of the process
    /// environment.
    pub fn to_intent_config_with<F>(&self, lookup: F) -> Result<IntentConfig, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_secret(&self.api_key_env, lookup)?;
        let config = IntentConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key,
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        };
        config
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        Ok(config)
    }
}

/// WhatsApp Cloud API sender settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppYamlConfig {
    pub phone_number_id: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Name of the environment variable holding the access token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
}

impl WhatsAppYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.phone_number_id.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "whatsapp.phone_number_id must not be empty".into(),
            ));
        }
        if !self.api_version.starts_with('v') {
            return Err(ConfigLoadError::Validation(format!(
                "whatsapp.api_version must look like v21.0, got {:?}",
                self.api_version
            )));
        }
        Ok(())
    }

    pub fn access_token(&self) -> Result<String, ConfigLoadError> {
        self.access_token_with(|name| std::env::var(name).ok())
    }

    pub fn access_token_with<F>(&self, lookup: F) -> Result<String, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        resolve_secret(&self.access_token_env, lookup)
    }
}

/// User prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptYamlConfig {
    /// Must contain `{{TON_INPUT}}`.
    #[serde(default = "default_template")]
    pub template: String,

    /// Plan given to customers the webhook creates.
    #[serde(default)]
    pub default_plan: Plan,
}

impl Default for PromptYamlConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            default_plan: Plan::default(),
        }
    }
}

impl PromptYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.template.contains(TON_INPUT_PLACEHOLDER) {
            return Err(ConfigLoadError::Validation(format!(
                "prompt.template must contain {TON_INPUT_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

fn resolve_secret<F>(variable: &str, lookup: F) -> Result<String, ConfigLoadError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(variable)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigLoadError::MissingSecret(variable.to_string()))
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_version() -> String {
    "v21.0".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_access_token_env() -> String {
    "WHATSAPP_ACCESS_TOKEN".to_string()
}

fn default_template() -> String {
    format!("Mensaje del cliente en formato TON:\n{TON_INPUT_PLACEHOLDER}")
}
