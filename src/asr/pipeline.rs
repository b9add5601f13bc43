use std::path::Path;

use super::interface::{AsrEngine, TranscriptionResult};
use crate::error::GatewayError;
use crate::utils::temp_audio::TempAudioFile;

/// Run one audio buffer through the engine.
///
/// The buffer is staged in a uniquely named file under the scratch
/// directory; the guard keeps the file alive for exactly the duration of
/// the engine call and removes it on success, failure, or cancellation.
pub async fn transcribe(
    engine: &dyn AsrEngine,
    scratch_dir: &Path,
    audio: &[u8],
) -> Result<TranscriptionResult, GatewayError> {
    let temp = TempAudioFile::create(scratch_dir, audio)
        .await
        .map_err(|e| GatewayError::Transcription(format!("failed to stage audio: {}", e)))?;

    engine.transcribe_file(temp.path()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::cli::CliAsrEngine;
    use crate::config::AsrConfig;

    #[tokio::test]
    #[cfg(unix)]
    async fn staged_file_is_gone_after_success_and_failure() {
        // Private scratch dir so concurrent tests cannot interfere.
        let scratch = std::env::temp_dir().join(format!("voxgate-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&scratch).unwrap();

        for engine_path in ["echo", "false"] {
            let engine = CliAsrEngine::new(&AsrConfig {
                engine_path: engine_path.to_string(),
                ..AsrConfig::default()
            });
            let _ = transcribe(&engine, &scratch, b"pcm data").await;
            let leftover = std::fs::read_dir(&scratch).unwrap().count();
            assert_eq!(leftover, 0, "{engine_path}");
        }

        std::fs::remove_dir_all(&scratch).ok();
    }

    #[tokio::test]
    async fn unwritable_scratch_dir_is_a_transcription_failure() {
        let engine = CliAsrEngine::new(&AsrConfig::default());
        let err = transcribe(&engine, Path::new("/nonexistent/scratch"), b"pcm")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transcription(_)));
    }
}
