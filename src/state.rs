use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::asr::factory::AsrFactory;
use crate::asr::interface::AsrEngine;
use crate::config::Config;
use crate::proxy::forwarder::ChatForwarder;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub asr: Arc<dyn AsrEngine>,
    pub forwarder: Arc<ChatForwarder>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let asr = AsrFactory::create_engine(&config.asr)?;

        // One pooled client for the proxy leg; it carries no request state,
        // only connections. Synthesis clients are built per request.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.chat.connect_timeout_secs))
            .build()?;
        let forwarder = Arc::new(ChatForwarder::new(http, &config.chat));

        Ok(Self {
            config,
            asr,
            forwarder,
        })
    }

    pub fn scratch_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.system.scratch_dir)
    }
}
