//! Decoding the kind of text chat models actually send back.

use serde_json::json;
use ton::{decode, encode, encode_json, TonMap, TonValue};

#[test]
fn reply_wrapped_in_prose_keeps_ton_lines() {
    let reply = "Claro, aquí tienes la respuesta:\n\nintent:\"pregunta_producto\"\nproduct_query:\"camisa azul\"\nquantity:\"2\"\nresponse:\"Sí, tenemos camisas azules en talla M\"\nconfidence:0.92\n\n¡Espero que te sirva!";
    let map = decode(reply);

    assert_eq!(map.len(), 5);
    assert_eq!(map.get_str("intent"), Some("pregunta_producto"));
    assert_eq!(map.get_str("product_query"), Some("camisa azul"));
    assert_eq!(map.get_str("response"), Some("Sí, tenemos camisas azules en talla M"));
    assert_eq!(map.get_number("confidence"), Some(0.92));
}

#[test]
fn windows_line_endings_and_indentation() {
    let map = decode("  intent:\"saludo\"\r\n\r\nconfidence: 0.5\r\n");
    assert_eq!(map.get_str("intent"), None, "leading spaces break the key");
    assert_eq!(map.get_number("confidence"), Some(0.5));
}

#[test]
fn escaped_quotes_inside_response() {
    let map = decode(r#"response:"Te recomiendo la \"edición especial\"""#);
    assert_eq!(map.get_str("response"), Some("Te recomiendo la \"edición especial\""));
}

#[test]
fn later_duplicate_wins() {
    let map = decode("intent:\"saludo\"\nintent:\"otro\"");
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_str("intent"), Some("otro"));
}

#[test]
fn bare_tokens_and_booleans() {
    let map = decode("intent:saludo\nurgent:true\nretry:false");
    assert_eq!(map.get("intent"), Some(&TonValue::String("saludo".into())));
    assert_eq!(map.get("urgent"), Some(&TonValue::Bool(true)));
    assert_eq!(map.get("retry"), Some(&TonValue::Bool(false)));
}

#[test]
fn json_input_encodes_in_member_order() {
    let value = json!({
        "text": "quiero \"2\" camisas",
        "from": "5215512345678",
        "skipped": null,
        "tags": ["ropa", 3],
        "vip": false
    });
    assert_eq!(
        encode_json(&value),
        "text:\"quiero \\\"2\\\" camisas\"\nfrom:\"5215512345678\"\ntags:[\"ropa\",3]\nvip:false"
    );
    assert_eq!(encode_json(&json!(["not", "an", "object"])), "");
}

#[test]
fn encoded_input_decodes_back() {
    let mut map = TonMap::new();
    map.insert("text", "hola quiero 2 camisas");
    map.insert("from", "5215512345678");
    map.insert("confidence", 0.75);
    map.insert("tags", vec!["ropa", "oferta"]);

    assert_eq!(decode(&encode(&map)), map);
}
