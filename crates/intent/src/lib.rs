//! Intent interpretation for WhatsApp commerce messages.
//!
//! A customer message arrives as TON text (see the `ton` crate). The
//! [`IntentInterpreter`] wraps it in a plan-specific system prompt, sends a
//! single chat-completion request, decodes the reply as TON, and fills any
//! gaps with defaults. The model only ever sees the intents its [`Plan`]
//! allows.
//!
//! ```no_run
//! use intent::{IntentConfig, IntentInterpreter, Plan};
//!
//! # async fn run() -> Result<(), intent::IntentError> {
//! let interpreter = IntentInterpreter::from_config(IntentConfig {
//!     api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! })?;
//! let result = interpreter
//!     .interpret_intent("text:\"hola\"", "Mensaje:\n{{TON_INPUT}}", Plan::Basic)
//!     .await?;
//! println!("{} -> {}", result.intent, result.response);
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod error;
mod interpreter;
mod plan;
mod prompt;
mod types;

pub use api::{
    ChatMessage, ChatRole, CompletionClient, CompletionRequest, OpenAiClient, ResponseFormat,
};
pub use config::{IntentConfig, TON_INPUT_PLACEHOLDER};
pub use error::IntentError;
pub use interpreter::IntentInterpreter;
pub use plan::{Intent, Plan};
pub use prompt::{render_user_prompt, system_prompt};
pub use types::{
    CampaignType, IntentResult, ProductSummary, DEFAULT_INTENT, DEFAULT_QUANTITY,
    FALLBACK_RESPONSE,
};
