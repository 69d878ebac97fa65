//! ChatTransport trait definition.
//!
//! The transport issues one POST carrying the full transcript and hands back
//! the response body as a stream of byte chunks. Non-successful statuses are
//! turned into [`ChatError::Transport`] before any body is returned.

use std::pin::Pin;

use futures_util::Stream;

use claimchat_types::chat::Transcript;
use claimchat_types::error::ChatError;

/// Response body as raw chunks, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ChatError>> + Send + 'static>>;

/// Trait for the HTTP side of a chat exchange.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in claimchat-infra (e.g., `HttpChatTransport`).
pub trait ChatTransport: Send + Sync {
    /// Human-readable transport name for logs (e.g., "relay", "openai").
    fn name(&self) -> &str;

    /// Send the transcript and open the streamed response body.
    ///
    /// The transcript always ends with a user turn.
    fn open_stream(
        &self,
        transcript: &Transcript,
    ) -> impl std::future::Future<Output = Result<ByteStream, ChatError>> + Send;
}
