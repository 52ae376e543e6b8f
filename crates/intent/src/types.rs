use serde::{Deserialize, Serialize};
use ton::{TonMap, TonValue};

use crate::plan::{Intent, Plan};

/// Intent used when the model omits one.
pub const DEFAULT_INTENT: &str = "otro";
/// Quantity used when the model omits one.
pub const DEFAULT_QUANTITY: &str = "1";
/// Reply sent when the model omits one.
pub const FALLBACK_RESPONSE: &str = "Lo siento, no pude entender tu mensaje.";

/// Interpreted customer message.
///
/// Always complete: `intent`, `quantity` and `response` are filled with
/// defaults when the model's TON output lacks them (or carries empty,
/// zero or false values there).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_query: Option<String>,
    pub quantity: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TonMap>,
}

impl IntentResult {
    /// Maps decoded TON into a result, applying the defaults.
    pub fn from_ton(map: &TonMap) -> Self {
        Self {
            intent: truthy_text(map, "intent").unwrap_or_else(|| DEFAULT_INTENT.to_string()),
            product_query: map.get("product_query").and_then(TonValue::scalar_text),
            quantity: truthy_text(map, "quantity").unwrap_or_else(|| DEFAULT_QUANTITY.to_string()),
            response: truthy_text(map, "response")
                .unwrap_or_else(|| FALLBACK_RESPONSE.to_string()),
            confidence: map.get("confidence").and_then(TonValue::as_f64),
            metadata: map.get("metadata").and_then(TonValue::as_map).cloned(),
        }
    }

    /// All-defaults result, what an empty or non-TON reply decodes to.
    pub fn fallback() -> Self {
        Self::from_ton(&TonMap::new())
    }

    /// Known intent label, if the model used one.
    pub fn parsed_intent(&self) -> Option<Intent> {
        Intent::from_label(&self.intent)
    }

    /// Whether the intent belongs to `plan`. Unknown labels are not allowed.
    pub fn is_allowed_for(&self, plan: Plan) -> bool {
        self.parsed_intent().is_some_and(|intent| plan.allows(intent))
    }
}

fn truthy_text(map: &TonMap, key: &str) -> Option<String> {
    map.get(key)
        .filter(|value| value.is_truthy())
        .and_then(TonValue::scalar_text)
}

/// Kind of outbound marketing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    AbandonedCart,
    WeeklyOffer,
    Marketing,
}

/// Product line quoted in a marketing prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub price: f64,
}

impl ProductSummary {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
