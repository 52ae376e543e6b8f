//! Typed TON values.
//!
//! Every decoded line becomes a [`TonValue`]; callers match on the variant
//! instead of guessing at a dynamic type. A document is a [`TonMap`].

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// A single TON value.
#[derive(Debug, Clone, PartialEq)]
pub enum TonValue {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<TonValue>),
    Map(TonMap),
}

impl TonValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TonValue]> {
        match self {
            TonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TonMap> {
        match self {
            TonValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value carries information: empty strings, `0`, `NaN` and
    /// `false` do not. Arrays and maps always do, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            TonValue::String(s) => !s.is_empty(),
            TonValue::Number(n) => *n != 0.0 && !n.is_nan(),
            TonValue::Bool(b) => *b,
            TonValue::Array(_) | TonValue::Map(_) => true,
        }
    }

    /// Scalar rendering without quotes: strings as-is, numbers and booleans
    /// as their TON literal. `None` for arrays and maps.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            TonValue::String(s) => Some(s.clone()),
            TonValue::Number(n) => Some(format_number(*n)),
            TonValue::Bool(b) => Some(b.to_string()),
            TonValue::Array(_) | TonValue::Map(_) => None,
        }
    }

    /// Converts a JSON value. `null` has no TON form and yields `None`;
    /// `null` members of objects and arrays are skipped.
    pub fn from_json(value: &Value) -> Option<TonValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(TonValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(TonValue::Number),
            Value::String(s) => Some(TonValue::String(s.clone())),
            Value::Array(items) => Some(TonValue::Array(
                items.iter().filter_map(TonValue::from_json).collect(),
            )),
            Value::Object(members) => Some(TonValue::Map(TonMap::from_json_object(members))),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            TonValue::String(s) => Value::String(s.clone()),
            TonValue::Number(n) => json_number(*n),
            TonValue::Bool(b) => Value::Bool(*b),
            TonValue::Array(items) => Value::Array(items.iter().map(TonValue::to_json).collect()),
            TonValue::Map(map) => map.to_json(),
        }
    }
}

/// Integral values print without a fractional part (`2`, not `2.0`).
/// `f64`'s `Display` never switches to exponent notation, so every finite
/// number renders in a shape the decoder reads back.
pub(crate) fn format_number(n: f64) -> String {
    format!("{n}")
}

fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<String> for TonValue {
    fn from(value: String) -> Self {
        TonValue::String(value)
    }
}

impl From<&str> for TonValue {
    fn from(value: &str) -> Self {
        TonValue::String(value.to_string())
    }
}

impl From<f64> for TonValue {
    fn from(value: f64) -> Self {
        TonValue::Number(value)
    }
}

impl From<i32> for TonValue {
    fn from(value: i32) -> Self {
        TonValue::Number(f64::from(value))
    }
}

impl From<u32> for TonValue {
    fn from(value: u32) -> Self {
        TonValue::Number(f64::from(value))
    }
}

impl From<i64> for TonValue {
    fn from(value: i64) -> Self {
        TonValue::Number(value as f64)
    }
}

impl From<bool> for TonValue {
    fn from(value: bool) -> Self {
        TonValue::Bool(value)
    }
}

impl From<TonMap> for TonValue {
    fn from(value: TonMap) -> Self {
        TonValue::Map(value)
    }
}

impl<T: Into<TonValue>> From<Vec<T>> for TonValue {
    fn from(value: Vec<T>) -> Self {
        TonValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl Serialize for TonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TonValue::String(s) => serializer.serialize_str(s),
            TonValue::Number(n) => serializer.serialize_f64(*n),
            TonValue::Bool(b) => serializer.serialize_bool(*b),
            TonValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TonValue::Map(map) => map.serialize(serializer),
        }
    }
}

/// Whether `key` can appear on the left of a TON line: `[A-Za-z0-9_]+`.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// An insertion-ordered TON document.
///
/// Inserting an existing key replaces its value and keeps the original
/// position, so decoding a document with a repeated key keeps the last
/// value. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct TonMap {
    entries: Vec<(String, TonValue)>,
}

impl TonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TonValue>) -> Option<TonValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TonValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TonValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(TonValue::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(TonValue::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<TonValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Builds a map from a JSON object, in the object's iteration order.
    pub fn from_json_object(members: &serde_json::Map<String, Value>) -> TonMap {
        members
            .iter()
            .filter_map(|(k, v)| TonValue::from_json(v).map(|v| (k.clone(), v)))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for TonMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<K: Into<String>, V: Into<TonValue>> FromIterator<(K, V)> for TonMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TonMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<TonValue>> Extend<(K, V)> for TonMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for TonMap {
    type Item = (String, TonValue);
    type IntoIter = std::vec::IntoIter<(String, TonValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for TonMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_replaces_in_place() {
        let mut map = TonMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        let previous = map.insert("a", "uno");

        assert_eq!(previous, Some(TonValue::Number(1.0)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get_str("a"), Some("uno"));
    }

    #[test]
    fn equality_ignores_order() {
        let left: TonMap = [("x", 1), ("y", 2)].into_iter().collect();
        let right: TonMap = [("y", 2), ("x", 1)].into_iter().collect();
        let other: TonMap = [("y", 2), ("x", 3)].into_iter().collect();

        assert_eq!(left, right);
        assert_ne!(left, other);
    }

    #[test]
    fn truthiness_follows_falsy_scalars() {
        assert!(!TonValue::from("").is_truthy());
        assert!(!TonValue::from(0).is_truthy());
        assert!(!TonValue::Number(f64::NAN).is_truthy());
        assert!(!TonValue::from(false).is_truthy());
        assert!(TonValue::from("0").is_truthy());
        assert!(TonValue::Array(Vec::new()).is_truthy());
    }

    #[test]
    fn json_conversion_skips_nulls() {
        let value = json!({
            "text": "hola",
            "missing": null,
            "count": 2,
            "ratio": 0.5,
            "list": ["a", null, 1],
            "nested": { "ok": true }
        });

        let map = match TonValue::from_json(&value) {
            Some(TonValue::Map(map)) => map,
            other => panic!("expected map, got {other:?}"),
        };

        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["text", "count", "ratio", "list", "nested"]
        );
        assert_eq!(
            map.get("list"),
            Some(&TonValue::Array(vec!["a".into(), 1.into()]))
        );
        assert_eq!(map.to_json(), json!({
            "text": "hola",
            "count": 2,
            "ratio": 0.5,
            "list": ["a", 1],
            "nested": { "ok": true }
        }));
    }

    #[test]
    fn keys_are_word_characters_only() {
        assert!(is_valid_key("product_query"));
        assert!(is_valid_key("A1"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a:b"));
        assert!(!is_valid_key("a\nb"));
        assert!(!is_valid_key("with space"));
    }
}
