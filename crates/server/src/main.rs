//! tonbot server binary
//!
//! Reads `.env`, `server.*` and `TONBOT_SERVER__*` settings and serves the
//! WhatsApp webhook.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
