//! HTTP side of a chat exchange.
//!
//! - [`openai::OpenAiClient`] posts streaming completion requests upstream,
//!   retrying rate-limited attempts. Shared by the direct transport and the
//!   relay server.
//! - [`transport::HttpChatTransport`] implements `ChatTransport` against
//!   either the relay or the upstream endpoint.
//! - [`error_body`] pulls a readable message out of a failed response.

pub mod error_body;
pub mod openai;
pub mod transport;
