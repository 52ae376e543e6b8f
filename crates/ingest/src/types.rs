use serde::{Deserialize, Serialize};
use ton::TonMap;

/// What the language model sees of an inbound message.
///
/// `text` is canonical text (see [`canonical::normalize_text`]); `from` and
/// `wa_id` are digit-only phone identifiers; `timestamp` is the Cloud API
/// epoch-seconds string, or an RFC 3339 time when the payload had none.
/// Built once per webhook event and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub text: String,
    pub from: String,
    pub wa_id: String,
    pub timestamp: String,
}

impl NormalizedMessage {
    /// The four fields, in wire order, as a TON document.
    pub fn to_ton(&self) -> TonMap {
        let mut map = TonMap::with_capacity(4);
        map.insert("text", self.text.as_str());
        map.insert("from", self.from.as_str());
        map.insert("wa_id", self.wa_id.as_str());
        map.insert("timestamp", self.timestamp.as_str());
        map
    }
}

/// An inbound `type: "text"` message as received, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundTextMessage {
    /// Cloud API message id (`wamid...`), empty when absent.
    pub message_id: String,
    /// Sender phone, digits only.
    pub from: String,
    /// Contact WhatsApp id, digits only; the sender phone when no contact
    /// block was sent.
    pub wa_id: String,
    /// Trimmed profile name, `None` when missing or blank.
    pub profile_name: Option<String>,
    /// Message body exactly as typed.
    pub text: String,
    pub timestamp: Option<String>,
}
