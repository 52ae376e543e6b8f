//! Read-only view over a Cloud API webhook body.
//!
//! Meta nests the interesting part as `entry[0].changes[0].value`, with the
//! sender in `value.messages[0]` and the contact in `value.contacts[0]`.
//! Every step of that path may be missing (status callbacks have no
//! `messages`, test pings have no `contacts`), so every lookup here returns
//! an `Option` and type mismatches read as absent.

use serde_json::Value;

pub(crate) struct WebhookView<'a> {
    value: Option<&'a Value>,
    message: Option<&'a Value>,
    contact: Option<&'a Value>,
}

impl<'a> WebhookView<'a> {
    pub(crate) fn new(payload: &'a Value) -> Self {
        let value = payload
            .get("entry")
            .and_then(|entries| entries.get(0))
            .and_then(|entry| entry.get("changes"))
            .and_then(|changes| changes.get(0))
            .and_then(|change| change.get("value"));
        let message = value
            .and_then(|v| v.get("messages"))
            .and_then(|messages| messages.get(0));
        let contact = value
            .and_then(|v| v.get("contacts"))
            .and_then(|contacts| contacts.get(0));

        Self {
            value,
            message,
            contact,
        }
    }

    pub(crate) fn has_message(&self) -> bool {
        self.message.is_some()
    }

    /// Non-empty string at `path` below `messages[0]`.
    pub(crate) fn message_str(&self, path: &[&str]) -> Option<&'a str> {
        non_empty_str(lookup(self.message, path))
    }

    /// String or number at `path` below `messages[0]`, rendered as text.
    /// Cloud API sends timestamps as strings; some relays send numbers.
    pub(crate) fn message_scalar(&self, path: &[&str]) -> Option<String> {
        match lookup(self.message, path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub(crate) fn contact_str(&self, path: &[&str]) -> Option<&'a str> {
        non_empty_str(lookup(self.contact, path))
    }

    pub(crate) fn value_str(&self, path: &[&str]) -> Option<&'a str> {
        non_empty_str(lookup(self.value, path))
    }
}

fn lookup<'a>(root: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root?, |node, key| node.get(*key))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
