//! Relay error type mapping to HTTP status codes and JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use claimchat_types::wire::RelayErrorBody;

/// Relay-level error rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum AppError {
    /// Body was not JSON or had no `messages` array.
    InvalidBody(String),
    /// No upstream key configured.
    MissingApiKey,
    /// Upstream answered with a non-2xx status.
    Upstream { status: u16, body: String },
    /// Upstream could not be reached.
    Internal(String),
    MethodNotAllowed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidBody(details) => {
                warn!(%details, "rejected relay request body");
                (
                    StatusCode::BAD_REQUEST,
                    RelayErrorBody {
                        details: Some(details),
                        ..RelayErrorBody::new("Invalid request body")
                    },
                )
            }
            AppError::MissingApiKey => {
                error!("relay request received but no OpenAI API key is configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayErrorBody::new("OpenAI API key is not configured"),
                )
            }
            AppError::Upstream { status, body } => {
                error!(status, body = %body, "upstream completion request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayErrorBody {
                        openai_error: Some(body),
                        status: Some(status),
                        ..RelayErrorBody::new("Failed to get AI response")
                    },
                )
            }
            AppError::Internal(message) => {
                error!(%message, "relay request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, RelayErrorBody::new(message))
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                RelayErrorBody::new("Method not allowed"),
            ),
        };

        (status, Json(body)).into_response()
    }
}
