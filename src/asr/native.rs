use async_trait::async_trait;
use std::path::Path;
use tracing::debug;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::interface::{AsrEngine, TranscriptSegment, TranscriptionResult};
use crate::config::AsrConfig;
use crate::error::GatewayError;

/// In-process transcription through the whisper.cpp bindings.
///
/// The invocation takes the same parameter object shape as the engine's
/// async entry point: language, model path, input file path. The context is
/// created per request; nothing is shared between invocations.
pub struct NativeAsrEngine {
    model_path: String,
    language: String,
}

impl NativeAsrEngine {
    pub fn new(config: &AsrConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl AsrEngine for NativeAsrEngine {
    async fn transcribe_file(
        &self,
        audio_path: &Path,
    ) -> Result<TranscriptionResult, GatewayError> {
        let model_path = self.model_path.clone();
        let language = self.language.clone();
        let fname_inp = audio_path.to_path_buf();

        // Inference is CPU-bound and must not stall the runtime.
        tokio::task::spawn_blocking(move || run_inference(&model_path, &language, &fname_inp))
            .await
            .map_err(|e| GatewayError::Transcription(format!("inference task failed: {}", e)))?
    }
}

fn run_inference(
    model_path: &str,
    language: &str,
    fname_inp: &Path,
) -> Result<TranscriptionResult, GatewayError> {
    let samples = read_samples(fname_inp)?;

    let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
        .map_err(|e| GatewayError::Transcription(format!("failed to load model: {:?}", e)))?;
    let mut state = ctx
        .create_state()
        .map_err(|e| GatewayError::Transcription(format!("failed to create state: {:?}", e)))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language));
    params.set_translate(false);
    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    state
        .full(params, &samples)
        .map_err(|e| GatewayError::Transcription(format!("inference failed: {:?}", e)))?;

    let num_segments = state
        .full_n_segments()
        .map_err(|e| GatewayError::Transcription(format!("segment count failed: {:?}", e)))?;
    debug!("native engine produced {} segments", num_segments);

    let mut segments = Vec::with_capacity(num_segments as usize);
    for i in 0..num_segments {
        let text = state
            .full_get_segment_text(i)
            .map_err(|e| GatewayError::Transcription(format!("segment text failed: {:?}", e)))?;
        let text = text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        // Timestamps arrive in centiseconds.
        let start = state.full_get_segment_t0(i).ok().map(|t| t.max(0) as u64 * 10);
        let end = state.full_get_segment_t1(i).ok().map(|t| t.max(0) as u64 * 10);
        segments.push(TranscriptSegment {
            text,
            start_ms: start,
            end_ms: end,
        });
    }

    if segments.is_empty() {
        return Err(GatewayError::Transcription(
            "engine produced no transcript".to_string(),
        ));
    }
    Ok(TranscriptionResult::new(segments))
}

/// Decode the input WAV into 16kHz mono f32, the only format the model
/// accepts.
fn read_samples(path: &Path) -> Result<Vec<f32>, GatewayError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| GatewayError::Transcription(format!("failed to open audio: {}", e)))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GatewayError::Transcription(format!("failed to decode audio: {}", e)))?,
        hound::SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|sample| sample as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| GatewayError::Transcription(format!("failed to decode audio: {}", e)))?
        }
    };

    let mono: Vec<f32> = if spec.channels == 2 {
        samples.chunks(2).map(|c| (c[0] + c[1]) / 2.0).collect()
    } else {
        samples
    };

    if spec.sample_rate == 16_000 {
        return Ok(mono);
    }
    let ratio = 16_000.0 / spec.sample_rate as f64;
    let new_len = (mono.len() as f64 * ratio) as usize;
    Ok((0..new_len)
        .map(|i| {
            let src_idx = (i as f64 / ratio) as usize;
            mono.get(src_idx).copied().unwrap_or(0.0)
        })
        .collect())
}
