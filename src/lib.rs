//! Workspace umbrella crate for tonbot.
//!
//! Stitches webhook normalization, the TON codec and intent interpretation
//! together so callers can go from a raw WhatsApp webhook payload to an
//! [`IntentResult`] with a single [`Pipeline`] call.

pub mod config;

pub use canonical::{collapse_whitespace, digits_only, is_valid_whatsapp_number, normalize_text};
pub use config::{
    AiYamlConfig, ConfigLoadError, PromptYamlConfig, TonbotConfig, WhatsAppYamlConfig,
};
pub use ingest::{
    InboundTextMessage, NormalizedMessage, extract_text_message, to_input_text,
    to_normalized_message, to_normalized_message_at,
};
pub use intent::{
    CampaignType, CompletionClient, CompletionRequest, DEFAULT_INTENT, DEFAULT_QUANTITY,
    FALLBACK_RESPONSE, Intent, IntentConfig, IntentError, IntentInterpreter, IntentResult,
    OpenAiClient, Plan, ProductSummary,
};
pub use ton::{TonMap, TonValue, decode as decode_ton, encode as encode_ton};

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while running a webhook payload through the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("payload carries no text message")]
    NoTextMessage,
    #[error("intent interpretation failed: {0}")]
    Interpret(#[from] IntentError),
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_normalize(&self, latency: Duration);
    fn record_interpret(&self, latency: Duration, result: Result<(), IntentError>);
}

struct MetricsSpan<'a> {
    recorder: &'a dyn PipelineMetrics,
    start: Instant,
}

impl<'a> MetricsSpan<'a> {
    fn start(recorder: Option<&'a Arc<dyn PipelineMetrics>>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder: recorder.as_ref(),
            start: Instant::now(),
        })
    }

    fn record_normalize(self) {
        self.recorder.record_normalize(self.start.elapsed());
    }

    fn record_interpret(self, result: Result<(), IntentError>) {
        self.recorder.record_interpret(self.start.elapsed(), result);
    }
}

/// Everything the pipeline derived from one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub inbound: InboundTextMessage,
    pub message: NormalizedMessage,
    /// TON text handed to the model.
    pub input_text: String,
    pub intent: IntentResult,
}

/// Webhook payload to [`IntentResult`].
///
/// The interpreter and the optional metrics observer are injected; nothing
/// here is process-global, so two pipelines with different observers can
/// run side by side.
#[derive(Clone)]
pub struct Pipeline {
    interpreter: Arc<IntentInterpreter>,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("interpreter", &self.interpreter)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new(interpreter: IntentInterpreter) -> Self {
        Self {
            interpreter: Arc::new(interpreter),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn interpreter(&self) -> &IntentInterpreter {
        &self.interpreter
    }

    /// Runs one webhook payload end to end.
    ///
    /// Payloads without a text message (status updates, images, ...) yield
    /// [`PipelineError::NoTextMessage`] before any model call is made.
    pub async fn process_webhook(
        &self,
        payload: &Value,
        prompt_template: &str,
        plan: Plan,
    ) -> Result<PipelineOutcome, PipelineError> {
        let inbound = extract_text_message(payload).ok_or(PipelineError::NoTextMessage)?;

        let span = MetricsSpan::start(self.metrics.as_ref());
        let message = to_normalized_message(payload);
        let input_text = to_input_text(&message);
        if let Some(span) = span {
            span.record_normalize();
        }
        debug!(from = %message.from, input_len = input_text.len(), "pipeline_normalized");

        let span = MetricsSpan::start(self.metrics.as_ref());
        let result = self
            .interpreter
            .interpret_intent(&input_text, prompt_template, plan)
            .await;
        if let Some(span) = span {
            span.record_interpret(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let intent = result?;

        info!(
            message_id = %inbound.message_id,
            plan = %plan,
            intent = %intent.intent,
            "pipeline_success"
        );

        Ok(PipelineOutcome {
            inbound,
            message,
            input_text,
            intent,
        })
    }
}
