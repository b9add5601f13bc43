use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GatewayError;

/// One unit of recognized text with optional timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
}

impl TranscriptSegment {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_ms: None,
            end_ms: None,
        }
    }
}

/// Ordered transcript as emitted by the engine.
///
/// Segments keep their chronological emission order; nothing downstream
/// reorders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptionResult {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// Newline-joined segment text, the flattened form served by `/stt`.
    pub fn flatten(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A transcription strategy.
///
/// Implementations are constructed per request and hold no state across
/// invocations; every strategy returns the same `TranscriptionResult`
/// contract regardless of how the engine is reached.
#[async_trait]
pub trait AsrEngine: Send + Sync {
    async fn transcribe_file(&self, audio_path: &Path)
        -> Result<TranscriptionResult, GatewayError>;
}
