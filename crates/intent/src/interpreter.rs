use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::api::{ChatMessage, CompletionClient, CompletionRequest, OpenAiClient, ResponseFormat};
use crate::config::IntentConfig;
use crate::error::IntentError;
use crate::plan::Plan;
use crate::prompt::{marketing_prompt, render_user_prompt, system_prompt, MARKETING_SYSTEM_PROMPT};
use crate::types::{CampaignType, IntentResult, ProductSummary};

const MARKETING_TEMPERATURE: f64 = 0.7;
const MARKETING_MAX_TOKENS: u32 = 200;

/// Turns TON-encoded customer messages into [`IntentResult`]s.
///
/// Holds its completion client explicitly; there is no process-wide client.
#[derive(Clone)]
pub struct IntentInterpreter {
    client: Arc<dyn CompletionClient>,
    config: IntentConfig,
}

impl std::fmt::Debug for IntentInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentInterpreter")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl IntentInterpreter {
    pub fn new(client: Arc<dyn CompletionClient>, config: IntentConfig) -> Self {
        Self { client, config }
    }

    /// Builds an interpreter backed by [`OpenAiClient`].
    pub fn from_config(config: IntentConfig) -> Result<Self, IntentError> {
        let client = OpenAiClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Request sent by [`interpret_intent`](Self::interpret_intent).
    pub fn build_request(&self, ton_input: &str, prompt_template: &str, plan: Plan) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt(plan)),
                ChatMessage::user(render_user_prompt(prompt_template, ton_input)),
            ],
            temperature: self.config.temperature,
            response_format: Some(ResponseFormat::text()),
            max_tokens: None,
        }
    }

    /// Interprets one message.
    ///
    /// Makes exactly one completion call. Whatever text comes back is
    /// decoded as TON and mapped with defaults, so a reply that is not
    /// TON at all still yields `intent = "otro"` and the fallback response.
    /// Only transport or upstream failures are errors.
    pub async fn interpret_intent(
        &self,
        ton_input: &str,
        prompt_template: &str,
        plan: Plan,
    ) -> Result<IntentResult, IntentError> {
        let request = self.build_request(ton_input, prompt_template, plan);
        let started = Instant::now();

        let content = match self.client.complete(&request).await {
            Ok(content) => content,
            Err(err) => {
                warn!(plan = %plan, error = %err, "intent_interpret_failed");
                return Err(err);
            }
        };

        let decoded = ton::decode(&content);
        let result = IntentResult::from_ton(&decoded);
        if !result.is_allowed_for(plan) {
            warn!(plan = %plan, intent = %result.intent, "intent_outside_plan");
        }

        info!(
            plan = %plan,
            intent = %result.intent,
            confidence = result.confidence,
            fields = decoded.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "intent_interpreted"
        );
        Ok(result)
    }

    /// Writes a short promotional message. Marketing is a `full`-plan
    /// feature; other plans get [`IntentError::PlanRestricted`] without a
    /// network call.
    pub async fn generate_marketing_message(
        &self,
        plan: Plan,
        customer_name: &str,
        products: &[ProductSummary],
        campaign: CampaignType,
    ) -> Result<String, IntentError> {
        if plan != Plan::Full {
            return Err(IntentError::PlanRestricted {
                plan,
                feature: "marketing messages",
            });
        }

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(MARKETING_SYSTEM_PROMPT),
                ChatMessage::user(marketing_prompt(customer_name, products, campaign)),
            ],
            temperature: MARKETING_TEMPERATURE,
            response_format: None,
            max_tokens: Some(MARKETING_MAX_TOKENS),
        };

        let message = self.client.complete(&request).await?;
        info!(campaign = ?campaign, products = products.len(), chars = message.chars().count(), "marketing_generated");
        Ok(message.trim().to_string())
    }
}
