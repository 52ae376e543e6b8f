mod support;

use std::sync::Arc;

use support::{ScriptedClient, TEMPLATE, intent_config, text_webhook};
use tonbot::{
    IntentInterpreter, Pipeline, PipelineError, Plan, encode_ton, normalize_text,
    to_input_text, to_normalized_message_at,
};

#[test]
fn equivalent_texts_normalize_identically() {
    let variants = [
        "¿Tienen CAFÉ orgánico?",
        "  tienen   cafe   organico ",
        "Tienen café, orgánico!!",
        "TIENEN\tCAFE\nORGANICO",
    ];
    for variant in variants {
        assert_eq!(normalize_text(variant), "tienen cafe organico", "{variant:?}");
    }
}

#[test]
fn input_text_is_stable_for_fixed_clock() {
    let payload = text_webhook("5215512345678", "Quiero 2 camisas");
    let mut without_ts = payload.clone();
    if let Some(message) = without_ts["entry"][0]["changes"][0]["value"]["messages"][0].as_object_mut() {
        message.remove("timestamp");
    }
    let now = "2024-06-10T12:00:00Z".parse().expect("timestamp");

    let a = to_input_text(&to_normalized_message_at(&without_ts, now));
    let b = to_input_text(&to_normalized_message_at(&without_ts, now));
    assert_eq!(a, b);
    assert!(a.contains("timestamp:\"2024-06-10T12:00:00.000Z\""));

    let with_ts = to_input_text(&to_normalized_message_at(&payload, now));
    assert!(with_ts.contains("timestamp:\"1718000000\""));
}

#[test]
fn encoding_follows_insertion_order() {
    let message = to_normalized_message_at(
        &text_webhook("5215512345678", "hola"),
        "2024-06-10T12:00:00Z".parse().expect("timestamp"),
    );
    let encoded = encode_ton(&message.to_ton());
    let keys: Vec<&str> = encoded
        .lines()
        .filter_map(|line| line.split_once(':').map(|(key, _)| key))
        .collect();
    assert_eq!(keys, ["text", "from", "wa_id", "timestamp"]);
}

#[tokio::test]
async fn concurrent_pipelines_agree() -> Result<(), PipelineError> {
    let client = Arc::new(ScriptedClient::ok("intent:\"saludo\"\nresponse:\"¡Hola!\""));
    let pipeline = Pipeline::new(IntentInterpreter::new(client.clone(), intent_config()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let payload = text_webhook(&format!("52155000000{i:02}"), "Hola");
            pipeline.process_webhook(&payload, TEMPLATE, Plan::Basic).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.expect("task panicked")?;
        assert_eq!(outcome.intent.intent, "saludo");
        assert_eq!(outcome.intent.response, "¡Hola!");
    }
    assert_eq!(client.requests().len(), 8);
    Ok(())
}
