use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::interface::{AsrEngine, TranscriptionResult};
use super::transcript::parse_transcript;
use crate::config::AsrConfig;
use crate::error::GatewayError;

/// Out-of-process transcription: spawns the engine executable once per
/// request with `-m <model> -f <input>` and parses its stdout.
pub struct CliAsrEngine {
    engine_path: String,
    model_path: String,
    timeout: Duration,
}

impl CliAsrEngine {
    pub fn new(config: &AsrConfig) -> Self {
        Self {
            engine_path: config.engine_path.clone(),
            model_path: config.model_path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn run_engine(&self, audio_path: &Path) -> Result<String, GatewayError> {
        let child = Command::new(&self.engine_path)
            .arg("-m")
            .arg(&self.model_path)
            .arg("-f")
            .arg(audio_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If the handler future is dropped (client disconnect, timeout),
            // the child must not outlive the request.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::Transcription(format!(
                    "failed to spawn engine {}: {}",
                    self.engine_path, e
                ))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                GatewayError::Transcription(format!(
                    "engine timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| GatewayError::Transcription(format!("engine I/O failure: {}", e)))?;

        // Stderr carries progress and model-load chatter; it is diagnostic
        // only and never a failure signal.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("engine stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            return Err(GatewayError::Transcription(format!(
                "engine exited with status {}",
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string())
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl AsrEngine for CliAsrEngine {
    async fn transcribe_file(
        &self,
        audio_path: &Path,
    ) -> Result<TranscriptionResult, GatewayError> {
        let stdout = self.run_engine(audio_path).await?;
        let result = parse_transcript(&stdout);
        if result.is_empty() {
            return Err(GatewayError::Transcription(
                "engine produced no transcript".to_string(),
            ));
        }
        Ok(result)
    }
}
