use futures::TryStreamExt;
use tracing::{debug, warn};

use super::interface::{SpeechStream, SynthesisRequest};
use crate::config::TtsConfig;
use crate::error::GatewayError;

/// Client for the external speech service.
///
/// Constructed per request. The service accepts `{text, voice, format}` and
/// answers with the encoded audio body; we relay its bytes as they arrive
/// rather than buffering the full clip.
pub struct SpeechServiceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SpeechServiceClient {
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Start synthesis and return the audio byte stream.
    ///
    /// Any failure up to the service's response headers surfaces here as
    /// `Synthesis` and can still become a 500. After that the stream is
    /// live: a mid-transfer error is logged and ends the stream, truncating
    /// the body the caller already started sending.
    pub async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SpeechStream, GatewayError> {
        debug!(
            "synthesis request: {} chars, voice={}",
            request.text.len(),
            request.voice
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Synthesis(format!(
                "speech service returned {}: {}",
                status, body
            )));
        }

        let stream = response
            .bytes_stream()
            .inspect_err(|e| warn!("speech stream failed mid-transfer: {}", e));
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::Router;
    use futures::StreamExt;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    async fn start_mock_speech_server(
        status: u16,
        body: &'static [u8],
    ) -> (String, oneshot::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().route(
            "/synthesize",
            post(move || async move {
                let status = axum::http::StatusCode::from_u16(status).unwrap();
                (status, body)
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let endpoint = format!("http://{}/synthesize", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        (endpoint, shutdown_tx)
    }

    fn config_for(endpoint: String) -> TtsConfig {
        TtsConfig {
            endpoint,
            ..TtsConfig::default()
        }
    }

    #[tokio::test]
    async fn service_audio_arrives_through_the_stream() {
        let (endpoint, shutdown_tx) = start_mock_speech_server(200, b"mp3-bytes").await;

        let client = SpeechServiceClient::new(&config_for(endpoint));
        let request = SynthesisRequest::new("hello".to_string(), None, &TtsConfig::default());
        let mut stream = client.synthesize(request).await.unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"mp3-bytes");
        shutdown_tx.send(()).ok();
    }

    #[tokio::test]
    async fn service_error_status_fails_before_first_byte() {
        let (endpoint, shutdown_tx) = start_mock_speech_server(500, b"engine crashed").await;

        let client = SpeechServiceClient::new(&config_for(endpoint));
        let request = SynthesisRequest::new("hello".to_string(), None, &TtsConfig::default());
        let err = match client.synthesize(request).await {
            Ok(_) => panic!("expected synthesis error"),
            Err(e) => e,
        };

        assert!(matches!(err, GatewayError::Synthesis(_)));
        assert!(err.to_string().contains("engine crashed"));
        shutdown_tx.send(()).ok();
    }

    #[tokio::test]
    async fn unreachable_service_fails_before_first_byte() {
        let client = SpeechServiceClient::new(&config_for(
            "http://127.0.0.1:1/synthesize".to_string(),
        ));
        let request = SynthesisRequest::new("hello".to_string(), None, &TtsConfig::default());
        let err = match client.synthesize(request).await {
            Ok(_) => panic!("expected synthesis error"),
            Err(e) => e,
        };
        assert!(matches!(err, GatewayError::Synthesis(_)));
    }

    #[test]
    fn request_voice_override_beats_config_default() {
        let config = TtsConfig::default();
        let request =
            SynthesisRequest::new("hi".to_string(), Some("en-GB-SoniaNeural".to_string()), &config);
        assert_eq!(request.voice, "en-GB-SoniaNeural");
        assert_eq!(request.format, config.output_format);

        let defaulted = SynthesisRequest::new("hi".to_string(), None, &config);
        assert_eq!(defaulted.voice, "en-US-AriaNeural");
    }
}
