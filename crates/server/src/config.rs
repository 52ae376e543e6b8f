use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level / env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Token Meta echoes back in `hub.verify_token` during webhook setup.
    /// Verification always fails while this is unset.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Path to the YAML pipeline file (model, WhatsApp sender, prompt).
    #[serde(default)]
    pub pipeline_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            verify_token: None,
            pipeline_config: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` file and
    /// `TONBOT_SERVER__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("TONBOT_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.verify_token.is_none() {
            tracing::warn!("No verify_token configured, webhook verification will be rejected");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
