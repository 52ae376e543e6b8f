//! TON (Tree Object Notation) codec.
//!
//! TON is the wire format between tonbot and the language model: one
//! `key:value` pair per line, nothing else. It is deliberately narrower than
//! JSON. A model that gets cut off mid-answer, or decides to chat before the
//! answer, still leaves behind lines we can read one at a time.
//!
//! ```text
//! intent:"pregunta_producto"
//! product_query:"pizza hawaiana"
//! quantity:2
//! confidence:0.87
//! tags:["menu","promo"]
//! ```
//!
//! ## Grammar
//!
//! - key: `[A-Za-z0-9_]+`, never contains `:` or a newline
//! - value: `"quoted string"` (only `\"` is escaped), signed integer or
//!   decimal, `true` / `false`, `[...]` flat array of quoted strings or bare
//!   numbers, `{...}` one flattened nested map (encode only), or a bare token
//!
//! ## Guarantees
//!
//! - [`encode`] and [`decode`] never fail.
//! - [`decode`] drops any line that is not `key:value` instead of rejecting the
//!   whole document.
//! - `decode(&encode(&m)) == m` for maps of newline-free strings, finite
//!   numbers, booleans and flat arrays of those. Nested maps are flattened on
//!   encode and come back as raw text.

mod decode;
mod encode;
mod value;

pub use crate::decode::{decode, validate};
pub use crate::encode::{encode, encode_json};
pub use crate::value::{is_valid_key, TonMap, TonValue};

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_map() -> TonMap {
        let mut map = TonMap::new();
        map.insert("intent", "saludo");
        map.insert("quantity", "2");
        map.insert("confidence", 0.87);
        map
    }

    #[test]
    fn intent_shaped_map_round_trips() {
        let map = intent_map();
        let text = encode(&map);
        assert_eq!(text, "intent:\"saludo\"\nquantity:\"2\"\nconfidence:0.87");
        assert_eq!(decode(&text), map);
    }

    #[test]
    fn garbage_lines_are_dropped() {
        let decoded = decode("intent:\"saludo\"\ngarbage line\nquantity:\"2\"");

        let mut expected = TonMap::new();
        expected.insert("intent", "saludo");
        expected.insert("quantity", "2");
        assert_eq!(decoded, expected);
    }

    #[test]
    fn string_arrays_round_trip() {
        let mut map = TonMap::new();
        map.insert("tags", vec!["a", "b"]);

        let text = encode(&map);
        assert_eq!(text, "tags:[\"a\",\"b\"]");
        assert_eq!(decode(&text), map);
    }

    #[test]
    fn mixed_scalars_round_trip() {
        let mut map = TonMap::new();
        map.insert("text", "dice \"hola\" y se va");
        map.insert("negative", -12.5);
        map.insert("whole", 3);
        map.insert("flag", true);
        map.insert("off", false);
        map.insert("prices", vec![TonValue::from(10), TonValue::from(2.5), TonValue::from(0)]);
        map.insert("blank", "");

        assert_eq!(decode(&encode(&map)), map);
    }

    #[test]
    fn nested_maps_flatten_on_encode() {
        let mut inner = TonMap::new();
        inner.insert("source", "whatsapp");
        inner.insert("retries", 1);

        let mut map = TonMap::new();
        map.insert("intent", "otro");
        map.insert("metadata", inner);

        let text = encode(&map);
        assert_eq!(text, "intent:\"otro\"\nmetadata:{source:\"whatsapp\" retries:1}");

        // One line per top-level key survives; the nested map comes back as text.
        let decoded = decode(&text);
        assert_eq!(decoded.get_str("intent"), Some("otro"));
        assert_eq!(
            decoded.get_str("metadata"),
            Some("{source:\"whatsapp\" retries:1}")
        );
    }
}
