use std::sync::Arc;
use tracing::info;

use super::cli::CliAsrEngine;
use super::interface::AsrEngine;
use crate::config::AsrConfig;
use crate::error::GatewayError;

/// Factory selecting the configured transcription strategy.
pub struct AsrFactory;

impl AsrFactory {
    pub fn create_engine(config: &AsrConfig) -> Result<Arc<dyn AsrEngine>, GatewayError> {
        match config.strategy.as_str() {
            "cli" => {
                info!("Initializing CLI transcription engine: {}", config.engine_path);
                Ok(Arc::new(CliAsrEngine::new(config)))
            }
            #[cfg(feature = "native-asr")]
            "native" => {
                info!("Initializing native transcription engine: {}", config.model_path);
                Ok(Arc::new(super::native::NativeAsrEngine::new(config)))
            }
            #[cfg(not(feature = "native-asr"))]
            "native" => Err(GatewayError::Transcription(
                "native strategy requires the `native-asr` build feature".to_string(),
            )),
            other => Err(GatewayError::Transcription(format!(
                "unknown transcription strategy: {}",
                other
            ))),
        }
    }
}
