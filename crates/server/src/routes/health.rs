use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

fn component(configured: bool) -> &'static str {
    if configured {
        "ready"
    } else {
        "disabled"
    }
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "tonbot-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// The store is always required; interpreter and sender report `disabled`
/// when not configured, which still counts as ready.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "status": "ready",
        "service": "tonbot-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "components": {
            "store": "ready",
            "interpreter": component(state.pipeline.is_some()),
            "sender": component(state.sender.is_some()),
        }
    })))
}

/// Pipeline counters
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let mut body = serde_json::to_value(state.counters.snapshot())?;
    body["uptime_seconds"] = json!(state.uptime_seconds());
    Ok(Json(body))
}
