//! Chat relay endpoint.
//!
//! POST /chat and POST /functions/v1/chat
//!
//! Accepts `{ "messages": [{ "role", "content" }] }`, forwards the turns to
//! the completion endpoint with the system prompt prepended, and pipes the
//! upstream SSE body back byte for byte.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use tracing::info;

use claimchat_types::wire::RelayRequest;

use crate::http::RelayState;
use crate::http::error::AppError;

/// Relay one exchange upstream and stream the reply back.
pub async fn relay_chat(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: RelayRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidBody(e.to_string()))?;

    let upstream = state.upstream.as_ref().ok_or(AppError::MissingApiKey)?;

    info!(
        turns = request.messages.len(),
        model = %upstream.model(),
        "relaying chat request"
    );

    let response = upstream
        .send(&request.messages)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    Ok((
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
        ],
        Body::from_stream(response.bytes_stream()),
    )
        .into_response())
}

/// Bare OPTIONS without CORS request headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
