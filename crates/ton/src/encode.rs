use serde_json::Value;
use tracing::debug;

use crate::value::{format_number, is_valid_key, TonMap, TonValue};

/// Serializes `map` into TON text, one line per entry, in insertion order.
///
/// Strings are quoted with only `"` escaped; numbers and booleans are bare;
/// arrays render as `[v1,v2]` with string elements quoted; nested maps are
/// encoded recursively and folded onto a single `{...}` line. Keys that are
/// not `[A-Za-z0-9_]+` cannot be read back and are skipped.
pub fn encode(map: &TonMap) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(map.len());
    for (key, value) in map.iter() {
        if !is_valid_key(key) {
            debug!(key, "ton_encode_skip_invalid_key");
            continue;
        }
        lines.push(format!("{key}:{}", encode_value(value)));
    }
    lines.join("\n")
}

/// Encodes a JSON object, skipping `null` members. Anything other than an
/// object has no line structure and encodes to an empty document.
pub fn encode_json(value: &Value) -> String {
    match value {
        Value::Object(members) => encode(&TonMap::from_json_object(members)),
        _ => String::new(),
    }
}

fn encode_value(value: &TonValue) -> String {
    match value {
        TonValue::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        TonValue::Number(n) => format_number(*n),
        TonValue::Bool(b) => b.to_string(),
        TonValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(encode_element).collect();
            format!("[{}]", rendered.join(","))
        }
        TonValue::Map(inner) => format!("{{{}}}", encode(inner).replace('\n', " ")),
    }
}

fn encode_element(value: &TonValue) -> String {
    match value {
        TonValue::String(s) => format!("\"{s}\""),
        other => encode_value(other),
    }
}
