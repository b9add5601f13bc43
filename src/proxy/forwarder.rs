use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{HeaderMap, HeaderName, HOST};
use axum::http::{Response, Uri};
use futures::TryStreamExt;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::error::GatewayError;

/// Routing prefix removed before forwarding.
const ROUTE_PREFIX: &str = "/chat";

/// Hop-by-hop fields (RFC 7230 §6.1) are owned by each connection and are
/// rewritten by the hop; everything else passes through untouched.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Streaming relay to the fixed upstream chat host.
///
/// Request bytes are forwarded as they arrive and the upstream response is
/// streamed back the same way; neither body is buffered in full. The hop
/// keeps memory bounded and lets the client and upstream throttle each
/// other through ordinary flow control.
pub struct ChatForwarder {
    client: reqwest::Client,
    base: String,
}

impl ChatForwarder {
    pub fn new(client: reqwest::Client, config: &ChatConfig) -> Self {
        let base = format!(
            "{}://{}:{}",
            config.upstream_scheme, config.upstream_host, config.upstream_port
        );
        Self { client, base }
    }

    /// Relay one request. Fails with `UpstreamConnect` only while the
    /// upstream response headers are still pending; after that, errors
    /// abort the in-flight stream instead.
    pub async fn forward(&self, req: Request) -> Result<Response<Body>, GatewayError> {
        let (parts, body) = req.into_parts();

        let target = format!("{}{}", self.base, upstream_path_and_query(&parts.uri));
        debug!("forwarding {} {}", parts.method, target);

        let mut headers = parts.headers;
        filter_request_headers(&mut headers);

        let upstream = self
            .client
            .request(parts.method, &target)
            .headers(headers)
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamConnect(e.to_string()))?;

        let mut builder = Response::builder().status(upstream.status());
        if let Some(response_headers) = builder.headers_mut() {
            for (name, value) in upstream.headers() {
                if !is_hop_by_hop(name) {
                    response_headers.append(name.clone(), value.clone());
                }
            }
        }

        let body_stream = upstream
            .bytes_stream()
            .inspect_err(|e| warn!("upstream stream failed mid-transfer: {}", e));

        builder
            .body(Body::from_stream(body_stream))
            .map_err(|e| GatewayError::UpstreamConnect(e.to_string()))
    }
}

/// Inbound path with the routing prefix removed and the query preserved.
fn upstream_path_and_query(uri: &Uri) -> String {
    let path = uri.path();
    let stripped = path.strip_prefix(ROUTE_PREFIX).unwrap_or(path);
    let path = if stripped.is_empty() { "/" } else { stripped };
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// The upstream must see its own `Host`; ours never crosses the hop.
fn filter_request_headers(headers: &mut HeaderMap) {
    headers.remove(HOST);
    let hop_fields: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name))
        .cloned()
        .collect();
    for name in hop_fields {
        headers.remove(name);
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}
