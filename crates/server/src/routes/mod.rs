//! API route handlers
//!
//! - `health`: liveness, readiness and counters
//! - `webhook`: Meta verification handshake and inbound deliveries

pub mod health;
pub mod webhook;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns server information including version and available endpoints.
///
/// # Response
///
/// ```json
/// {
///   "name": "tonbot server",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "tonbot server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /webhook",
            "POST /webhook",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
