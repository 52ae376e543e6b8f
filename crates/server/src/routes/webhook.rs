//! `GET /webhook` answers Meta's subscription handshake; `POST /webhook`
//! receives message deliveries.

use crate::error::{ServerError, ServerResult};
use crate::store::MessageRecord;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Body Meta expects back for every delivery.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Echoes `hub.challenge` when `hub.mode` is `subscribe` and the token
/// matches the configured one.
pub async fn verify_webhook(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<VerifyParams>,
) -> ServerResult<impl IntoResponse> {
    let expected = state.config.verify_token.as_deref();
    match (params.mode.as_deref(), params.verify_token.as_deref(), expected) {
        (Some("subscribe"), Some(token), Some(expected)) if token == expected => {
            info!("webhook_verified");
            Ok((
                [(CONTENT_TYPE, "text/plain")],
                params.challenge.unwrap_or_default(),
            ))
        }
        _ => {
            warn!(mode = ?params.mode, "webhook_verification_rejected");
            Err(ServerError::VerificationFailed)
        }
    }
}

/// Accepts a delivery. Always answers 200 `EVENT_RECEIVED`; failures are
/// logged, since a non-200 only makes Meta retry the same event.
///
/// The delivery runs on its own task so it completes even when the caller
/// disconnects before the reply has been sent.
pub async fn receive_webhook(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.counters.record_webhook();
    let task = tokio::spawn(async move {
        if let Err(err) = handle_delivery(&state, &headers, &body).await {
            warn!(code = err.error_code(), error = %err, "webhook_processing_failed");
        }
    });
    if let Err(err) = task.await {
        error!(error = %err, "webhook_task_failed");
    }
    (StatusCode::OK, EVENT_RECEIVED)
}

async fn handle_delivery(state: &ServerState, headers: &HeaderMap, body: &[u8]) -> ServerResult<()> {
    if !state.verifier.verify(headers, body) {
        return Err(ServerError::InvalidSignature);
    }

    let payload: Value = serde_json::from_slice(body)?;
    let Some(inbound) = ingest::extract_text_message(&payload) else {
        debug!("webhook_without_text_message");
        return Ok(());
    };
    if inbound.from.is_empty() {
        return Err(ServerError::BadRequest("text message without sender".into()));
    }

    let customer = state
        .store
        .get_or_create_customer(
            &inbound.from,
            inbound.profile_name.as_deref(),
            Some(inbound.wa_id.as_str()),
        )
        .await?;

    let normalized = ingest::to_normalized_message(&payload);
    state
        .store
        .record_message(MessageRecord::inbound_text(
            &customer,
            inbound.text.as_str(),
            normalized.to_ton().to_json(),
        ))
        .await?;
    info!(
        customer_id = %customer.id,
        message_id = %inbound.message_id,
        plan = %customer.plan,
        "inbound_message_recorded"
    );

    let Some(pipeline) = &state.pipeline else {
        return Ok(());
    };
    let outcome = pipeline
        .process_webhook(&payload, &state.prompt.template, customer.plan)
        .await?;
    let reply = outcome.intent.response;

    let Some(sender) = &state.sender else {
        debug!(intent = %outcome.intent.intent, "reply_not_sent_no_sender");
        return Ok(());
    };
    match sender.send_text_message(&customer.phone, &reply).await {
        Ok(receipt) => {
            state.counters.record_reply(true);
            state
                .store
                .record_message(MessageRecord::outbound_text(&customer, reply))
                .await?;
            info!(
                customer_id = %customer.id,
                intent = %outcome.intent.intent,
                wamid = receipt.message_id.as_deref().unwrap_or(""),
                "reply_sent"
            );
            Ok(())
        }
        Err(err) => {
            state.counters.record_reply(false);
            Err(err.into())
        }
    }
}
