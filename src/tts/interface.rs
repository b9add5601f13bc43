use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::config::TtsConfig;

/// One synthesis call. Built fresh per request; no engine state is carried
/// across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub format: String,
}

impl SynthesisRequest {
    /// Fill voice and output format from config, letting the caller
    /// override the voice profile.
    pub fn new(text: String, voice: Option<String>, config: &TtsConfig) -> Self {
        Self {
            text,
            voice: voice.unwrap_or_else(|| config.voice.clone()),
            format: config.output_format.clone(),
        }
    }
}

/// Lazily produced audio bytes. Items arrive as the engine emits them; an
/// `Err` item terminates the stream mid-body.
pub type SpeechStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;
