//! Request bodies and error envelopes exchanged with the completion endpoint.

use serde::{Deserialize, Serialize};

use crate::chat::Transcript;

/// Body posted to the relay: just the turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub messages: Transcript,
}

/// A message in an upstream completion request.
///
/// Unlike [`crate::chat::Turn`], the role is free-form so the system prompt
/// can be prepended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

/// Streaming chat completion request sent to the OpenAI endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
    pub stream: bool,
    pub max_completion_tokens: u32,
}

/// Error body returned by the relay when the upstream call fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayErrorBody {
    pub error: String,
    #[serde(rename = "openaiError", skip_serializing_if = "Option::is_none")]
    pub openai_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            openai_error: None,
            status: None,
            details: None,
        }
    }
}
