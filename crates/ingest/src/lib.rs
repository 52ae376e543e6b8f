//! tonbot ingest layer
//!
//! This is where WhatsApp traffic enters the assistant. Meta posts Cloud API
//! webhook events; we pull out the one message we care about, fold its text
//! with [`canonical::normalize_text`], and hand the language model a small
//! TON document instead of the raw payload.
//!
//! ## What we do here
//!
//! - **Tolerant extraction** - every path in the payload is optional. A
//!   missing or oddly typed field becomes an empty string, never an error.
//! - **Normalize** - message text goes through the canonical normalizer,
//!   phone identifiers are reduced to digits.
//! - **Serialize for the model** - [`to_input_text`] renders the record as TON.
//! - **Filter** - [`extract_text_message`] only yields real text messages,
//!   so status callbacks and media can be skipped upstream.
//!
//! ## Example
//!
//! ```
//! use ingest::{to_input_text, to_normalized_message};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "entry": [{ "changes": [{ "value": {
//!         "contacts": [{ "wa_id": "5215512345678", "profile": { "name": "Ana" } }],
//!         "messages": [{
//!             "from": "+52 1 55 1234 5678",
//!             "id": "wamid.1",
//!             "timestamp": "1700000000",
//!             "type": "text",
//!             "text": { "body": "¿Tienen Café?" }
//!         }]
//!     }}]}]
//! });
//!
//! let message = to_normalized_message(&payload);
//! assert_eq!(message.text, "tienen cafe");
//! assert_eq!(message.from, "5215512345678");
//! assert_eq!(
//!     to_input_text(&message),
//!     "text:\"tienen cafe\"\nfrom:\"5215512345678\"\nwa_id:\"5215512345678\"\ntimestamp:\"1700000000\""
//! );
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

mod payload;
mod types;

use crate::payload::WebhookView;

pub use crate::types::{InboundTextMessage, NormalizedMessage};

/// Maps a webhook payload to a [`NormalizedMessage`], stamping it with the
/// current time when the payload carries no timestamp. Never fails.
pub fn to_normalized_message(payload: &Value) -> NormalizedMessage {
    to_normalized_message_at(payload, Utc::now())
}

/// Same as [`to_normalized_message`] with an explicit fallback clock.
pub fn to_normalized_message_at(payload: &Value, now: DateTime<Utc>) -> NormalizedMessage {
    let view = WebhookView::new(payload);

    let text = view
        .message_str(&["text", "body"])
        .or_else(|| view.message_str(&["body"]))
        .unwrap_or_default();
    let from = view
        .message_str(&["from"])
        .or_else(|| view.value_str(&["metadata", "phone_number_id"]))
        .unwrap_or_default();
    let wa_id = view
        .contact_str(&["wa_id"])
        .or_else(|| view.message_str(&["from"]))
        .unwrap_or_default();
    let timestamp = view
        .message_scalar(&["timestamp"])
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

    let message = NormalizedMessage {
        text: canonical::normalize_text(text),
        from: canonical::digits_only(from),
        wa_id: canonical::digits_only(wa_id),
        timestamp,
    };

    debug!(
        from = %message.from,
        wa_id = %message.wa_id,
        raw_len = text.len(),
        normalized_len = message.text.len(),
        has_message = view.has_message(),
        "ingest_normalized"
    );

    message
}

/// Renders the record as the TON document handed to the language model.
pub fn to_input_text(message: &NormalizedMessage) -> String {
    ton::encode(&message.to_ton())
}

/// Returns the first inbound message when it is a `text` message.
///
/// Unlike [`to_normalized_message`] this keeps the body as typed (it is what
/// gets stored and shown to operators) and carries the message id and the
/// sender's profile name.
pub fn extract_text_message(payload: &Value) -> Option<InboundTextMessage> {
    let view = WebhookView::new(payload);
    if view.message_str(&["type"]) != Some("text") {
        debug!(
            has_message = view.has_message(),
            message_type = view.message_str(&["type"]).unwrap_or(""),
            "ingest_skip_non_text"
        );
        return None;
    }

    let from = canonical::digits_only(view.message_str(&["from"]).unwrap_or_default());
    let wa_id = view
        .contact_str(&["wa_id"])
        .map(canonical::digits_only)
        .unwrap_or_else(|| from.clone());

    Some(InboundTextMessage {
        message_id: view.message_str(&["id"]).unwrap_or_default().to_string(),
        from,
        wa_id,
        profile_name: view
            .contact_str(&["profile", "name"])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        text: view.message_str(&["text", "body"]).unwrap_or_default().to_string(),
        timestamp: view.message_scalar(&["timestamp"]),
    })
}
