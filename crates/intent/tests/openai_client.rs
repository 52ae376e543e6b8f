use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use intent::{IntentConfig, IntentError, IntentInterpreter, Plan};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().await.push((auth, request));
    (stub.status, Json(stub.body.clone()))
}

async fn spawn_stub(stub: Stub) -> anyhow::Result<String> {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(stub);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/v1"))
}

fn stub(status: StatusCode, body: Value) -> Stub {
    Stub {
        status,
        body,
        seen: Arc::new(Mutex::new(Vec::new())),
    }
}

fn interpreter(base_url: String) -> anyhow::Result<IntentInterpreter> {
    Ok(IntentInterpreter::from_config(IntentConfig {
        api_key: "sk-test".into(),
        base_url,
        timeout_secs: 5,
        ..Default::default()
    })?)
}

#[tokio::test]
async fn successful_completion_is_decoded() -> anyhow::Result<()> {
    let stub = stub(
        StatusCode::OK,
        json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "intent:\"pregunta_producto\"\nproduct_query:\"camisa\"\nresponse:\"Sí, tenemos camisas.\"\nconfidence:0.9"
                }
            }]
        }),
    );
    let seen = stub.seen.clone();
    let base_url = spawn_stub(stub).await?;

    let result = interpreter(base_url)?
        .interpret_intent("text:\"tienen camisas\"", "Cliente:\n{{TON_INPUT}}", Plan::Basic)
        .await?;

    assert_eq!(result.intent, "pregunta_producto");
    assert_eq!(result.product_query.as_deref(), Some("camisa"));
    assert_eq!(result.response, "Sí, tenemos camisas.");

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["response_format"]["type"], "text");
    assert_eq!(body["messages"][1]["content"], "Cliente:\ntext:\"tienen camisas\"");
    Ok(())
}

#[tokio::test]
async fn error_status_maps_to_upstream_with_message() -> anyhow::Result<()> {
    let base_url = spawn_stub(stub(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}),
    ))
    .await?;

    let err = interpreter(base_url)?
        .interpret_intent("text:\"hola\"", "{{TON_INPUT}}", Plan::Basic)
        .await
        .expect_err("401 must fail");

    assert_eq!(
        err,
        IntentError::Upstream {
            status: Some(401),
            message: "OpenAI API error: Incorrect API key provided".into(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn error_without_envelope_is_unknown() -> anyhow::Result<()> {
    let base_url = spawn_stub(stub(StatusCode::BAD_GATEWAY, json!({"detail": "bad gateway"}))).await?;

    let err = interpreter(base_url)?
        .interpret_intent("text:\"hola\"", "{{TON_INPUT}}", Plan::Basic)
        .await
        .expect_err("502 must fail");

    match err {
        IntentError::Upstream { status, message } => {
            assert_eq!(status, Some(502));
            assert_eq!(message, "OpenAI API error: Unknown error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn success_without_choices_is_upstream_error() -> anyhow::Result<()> {
    let base_url = spawn_stub(stub(StatusCode::OK, json!({"choices": []}))).await?;

    let err = interpreter(base_url)?
        .interpret_intent("text:\"hola\"", "{{TON_INPUT}}", Plan::Basic)
        .await
        .expect_err("empty choices must fail");
    assert!(err.is_upstream());
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = interpreter(format!("http://{addr}/v1"))?
        .interpret_intent("text:\"hola\"", "{{TON_INPUT}}", Plan::Basic)
        .await
        .expect_err("closed port must fail");
    assert!(matches!(err, IntentError::Transport(_)));
    Ok(())
}
