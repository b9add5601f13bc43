use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the gateway.
///
/// Conversion into an HTTP response only happens while no response headers
/// have been written. Once a streamed body has started, the status line is
/// gone; a failure at that point terminates the stream (the client observes
/// a truncated body) and is logged by the component that owns the stream.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to read audio body: {0}")]
    AudioRead(String),

    /// Engine exited non-zero, timed out, or produced unparseable output.
    #[error("{0}")]
    Transcription(String),

    /// Synthesis failed before the first audio byte was emitted.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The upstream chat host could not be reached or failed before its
    /// response headers arrived. Never retried.
    #[error("upstream request failed: {0}")]
    UpstreamConnect(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    RouteNotFound,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::AudioRead(_)
            | GatewayError::Transcription(_)
            | GatewayError::Synthesis(_)
            | GatewayError::UpstreamConnect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Routing misses answer in plain text.
            GatewayError::MethodNotAllowed | GatewayError::RouteNotFound => {
                (status, self.to_string()).into_response()
            }
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}
