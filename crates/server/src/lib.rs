//! tonbot server - WhatsApp Cloud API webhook service
//!
//! Receives Meta webhook deliveries, stores customers and messages, runs
//! text messages through the [`tonbot::Pipeline`] with the customer's plan
//! and sends the model's reply back over WhatsApp.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with component status
//! - `GET /metrics` - Pipeline counters
//! - `GET /webhook` - Meta subscription handshake
//! - `POST /webhook` - Message deliveries (always `200 EVENT_RECEIVED`)

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod signature;
pub mod state;
pub mod store;
pub mod whatsapp;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use signature::{AcceptAll, SignatureVerifier};
pub use state::ServerState;
pub use store::{Customer, CustomerStore, Direction, InMemoryStore, MessageRecord, StoreError};
pub use whatsapp::{MessageSender, SendReceipt, WhatsAppClient, WhatsAppConfig, WhatsAppError};
