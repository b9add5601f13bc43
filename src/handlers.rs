use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::asr::pipeline;
use crate::error::GatewayError;
use crate::state::AppState;
use crate::tts::client::SpeechServiceClient;
use crate::tts::interface::SynthesisRequest;

/// POST /stt — raw audio bytes in, flattened transcript out.
pub async fn stt(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, GatewayError> {
    let audio = to_bytes(req.into_body(), state.config.system.max_audio_bytes)
        .await
        .map_err(|e| GatewayError::AudioRead(e.to_string()))?;
    info!("stt request: {} bytes", audio.len());

    let result = pipeline::transcribe(state.asr.as_ref(), &state.scratch_dir(), &audio).await?;
    Ok(Json(json!({ "text": result.flatten() })))
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

/// POST /tts — synthesized speech, streamed as the engine produces it.
///
/// Failures after this handler returns (mid-stream) cannot change the
/// already-sent status; they terminate the body instead.
pub async fn tts(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Response<Body>, GatewayError> {
    info!("tts request: {} chars", req.text.len());

    let request = SynthesisRequest::new(req.text, req.voice, &state.config.tts);
    let client = SpeechServiceClient::new(&state.config.tts);
    let stream = client.synthesize(request).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .body(Body::from_stream(stream))
        .map_err(|e| GatewayError::Synthesis(e.to_string()))
}

/// /chat and everything under it — streamed through to the upstream host.
pub async fn chat_proxy(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response<Body>, GatewayError> {
    state.forwarder.forward(req).await
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub stt: bool,
    pub tts: bool,
    pub chat: bool,
}

/// /ping — a declared capability set, not a liveness probe; it answers the
/// same regardless of backend availability.
pub async fn ping() -> Json<Capabilities> {
    Json(Capabilities {
        stt: true,
        tts: true,
        chat: true,
    })
}

pub async fn not_found() -> GatewayError {
    GatewayError::RouteNotFound
}

pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}
