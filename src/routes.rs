use axum::routing::{any, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the route table.
///
/// This is the complete, closed set of routes the gateway answers, resolved
/// once at startup; each entry is bound to its fixed handler. Anything else
/// falls through to 404, and a known path with the wrong method answers
/// 405.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/stt",
            post(handlers::stt).fallback(handlers::method_not_allowed),
        )
        .route(
            "/tts",
            post(handlers::tts).fallback(handlers::method_not_allowed),
        )
        .route("/chat", any(handlers::chat_proxy))
        .route("/chat/*upstream", any(handlers::chat_proxy))
        .route("/ping", any(handlers::ping))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
