//! Axum router for the relay with CORS and request tracing.

use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::RelayState;
use crate::http::handlers;

/// Build the relay router.
///
/// The chat endpoint is served at `/chat` and at `/functions/v1/chat`, the
/// path hosted deployments use.
pub fn build_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
        .max_age(Duration::from_secs(86_400));

    let chat = post(handlers::chat::relay_chat)
        .options(handlers::chat::preflight)
        .fallback(handlers::chat::method_not_allowed);

    Router::new()
        .route("/chat", chat.clone())
        .route("/functions/v1/chat", chat)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
