use crate::value::{is_valid_key, TonMap, TonValue};

/// Parses TON text into a [`TonMap`].
///
/// This is a total function. Blank lines and lines that are not
/// `key:value` (key made of `[A-Za-z0-9_]`, at least one character after the
/// colon) are dropped one by one; the rest of the document still decodes.
/// When a key repeats, the last line wins.
///
/// Values are classified after trimming, first match wins:
///
/// 1. `"..."` is a string, with `\"` unescaped
/// 2. `-?\d+\.?\d*` is a number
/// 3. `true` / `false` is a boolean
/// 4. `[...]` is an array; elements are split on `,`, trimmed, and each is a
///    quoted string, a number, or a raw token
/// 5. anything else is kept as a raw string
///
/// Lines may end in `\n` or `\r\n`.
pub fn decode(text: &str) -> TonMap {
    let mut map = TonMap::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((key, raw)) = split_line(line) {
            map.insert(key, classify(raw.trim()));
        }
    }
    map
}

/// Reports whether `text` is usable TON. Since [`decode`] accepts any input
/// this is always `true`; it exists so callers can keep a validation step
/// in their flow without special-casing TON.
pub fn validate(text: &str) -> bool {
    let _ = decode(text);
    true
}

/// Splits `key:value` at the first colon. The key must be a valid TON key
/// starting at column zero and the value must be non-empty.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    if !is_valid_key(key) || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn classify(value: &str) -> TonValue {
    if let Some(inner) = quoted(value) {
        return TonValue::String(inner.replace("\\\"", "\""));
    }
    if let Some(n) = parse_number(value) {
        return TonValue::Number(n);
    }
    match value {
        "true" => return TonValue::Bool(true),
        "false" => return TonValue::Bool(false),
        _ => {}
    }
    if value.starts_with('[') && value.ends_with(']') && value.len() >= 2 {
        return TonValue::Array(parse_array(&value[1..value.len() - 1]));
    }
    TonValue::String(value.to_string())
}

/// Inner text of a value that both starts and ends with `"`. A lone `"`
/// counts as an empty string.
fn quoted(value: &str) -> Option<&str> {
    if !(value.starts_with('"') && value.ends_with('"')) {
        return None;
    }
    Some(if value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        ""
    })
}

fn parse_array(inner: &str) -> Vec<TonValue> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|element| {
            let element = element.trim();
            if let Some(s) = quoted(element) {
                TonValue::String(s.to_string())
            } else if let Some(n) = parse_number(element) {
                TonValue::Number(n)
            } else {
                TonValue::String(element.to_string())
            }
        })
        .collect()
}

/// Accepts exactly `-?\d+\.?\d*` (ASCII digits): an optional minus, at least
/// one digit, an optional dot, optional trailing digits. No exponent, no
/// leading dot, no plus sign.
fn parse_number(value: &str) -> Option<f64> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    value.parse::<f64>().ok()
}
