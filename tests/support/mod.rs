#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use tonbot::{CompletionClient, CompletionRequest, IntentConfig, IntentError};

/// Completion client that answers every request with the same reply and
/// remembers what it was asked.
pub struct ScriptedClient {
    reply: Result<String, IntentError>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: IntentError) -> Self {
        Self {
            reply: Err(err),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, IntentError> {
        self.seen.lock().expect("lock").push(request.clone());
        self.reply.clone()
    }
}

pub fn intent_config() -> IntentConfig {
    IntentConfig {
        api_key: "sk-test".into(),
        ..Default::default()
    }
}

pub const TEMPLATE: &str = "Mensaje del cliente en formato TON:\n{{TON_INPUT}}";

/// Meta Cloud API webhook carrying a single text message.
pub fn text_webhook(from: &str, body: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550001111",
                        "phone_number_id": "109876543210"
                    },
                    "contacts": [{
                        "profile": {"name": "Ana"},
                        "wa_id": from
                    }],
                    "messages": [{
                        "from": from,
                        "id": "wamid.HBgLNTIxNTU1",
                        "timestamp": "1718000000",
                        "type": "text",
                        "text": {"body": body}
                    }]
                }
            }]
        }]
    })
}

/// Delivery status update: no `messages` array.
pub fn status_webhook() -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "field": "messages",
                "value": {
                    "metadata": {"phone_number_id": "109876543210"},
                    "statuses": [{"id": "wamid.X", "status": "delivered"}]
                }
            }]
        }]
    })
}
