use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::metrics::PipelineCounters;
use crate::signature::{AcceptAll, SignatureVerifier};
use crate::store::{CustomerStore, InMemoryStore};
use crate::whatsapp::{MessageSender, WhatsAppClient, WhatsAppConfig};
use intent::IntentInterpreter;
use std::sync::Arc;
use std::time::Instant;
use tonbot::{Pipeline, PromptYamlConfig, TonbotConfig};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    pub store: Arc<dyn CustomerStore>,

    /// Present when a model endpoint is configured; otherwise messages are
    /// stored but not interpreted.
    pub pipeline: Option<Pipeline>,

    /// Present when a WhatsApp sender is configured; otherwise replies are
    /// computed but not sent.
    pub sender: Option<Arc<dyn MessageSender>>,

    pub verifier: Arc<dyn SignatureVerifier>,

    pub prompt: PromptYamlConfig,

    pub counters: Arc<PipelineCounters>,

    pub started_at: Instant,
}

impl ServerState {
    /// State with an in-memory store and nothing else wired in.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(InMemoryStore::new()),
            pipeline: None,
            sender: None,
            verifier: Arc::new(AcceptAll),
            prompt: PromptYamlConfig::default(),
            counters: Arc::new(PipelineCounters::default()),
            started_at: Instant::now(),
        }
    }

    /// Builds state from the server config, loading the YAML pipeline file
    /// it points to (if any) and resolving secrets from the environment.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let Some(path) = config.pipeline_config.clone() else {
            tracing::warn!("No pipeline_config set, running in store-only mode");
            return Ok(Self::new(config));
        };

        let pipeline_cfg = TonbotConfig::from_file(&path)?;
        let mut state = Self::new(config)
            .with_store(Arc::new(
                InMemoryStore::new().with_default_plan(pipeline_cfg.prompt.default_plan),
            ))
            .with_prompt(pipeline_cfg.prompt.clone());

        if let Some(ai) = &pipeline_cfg.ai {
            let interpreter = IntentInterpreter::from_config(ai.to_intent_config()?)?;
            state = state.with_interpreter(interpreter);
        }
        if let Some(whatsapp) = &pipeline_cfg.whatsapp {
            let client = WhatsAppClient::new(&WhatsAppConfig::from_yaml(whatsapp)?)?;
            state = state.with_sender(Arc::new(client));
        }

        tracing::info!(
            path = %path.display(),
            interpreter = state.pipeline.is_some(),
            sender = state.sender.is_some(),
            "pipeline_config_loaded"
        );
        Ok(state)
    }

    /// Installs the interpreter; pipeline metrics feed [`Self::counters`].
    pub fn with_interpreter(mut self, interpreter: IntentInterpreter) -> Self {
        let metrics = self.counters.clone();
        self.pipeline = Some(Pipeline::new(interpreter).with_metrics(metrics));
        self
    }

    pub fn with_sender(mut self, sender: Arc<dyn MessageSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn CustomerStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptYamlConfig) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
