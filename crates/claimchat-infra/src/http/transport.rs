//! `ChatTransport` over HTTP.
//!
//! Two targets, chosen once at startup:
//!
//! - **Relay**: POST `{ messages }` to the relay URL with
//!   `Accept: text/event-stream` and an optional bearer access token. The
//!   relay holds the upstream key and prepends the system prompt.
//! - **OpenAi**: talk to the completion endpoint directly via
//!   [`OpenAiClient`] when a key is available locally.
//!
//! Either way, a non-2xx status is turned into [`ChatError::Transport`]
//! with the best message found in the body, and a 2xx response with no
//! body is [`ChatError::MissingBody`].

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use claimchat_core::chat::transport::{ByteStream, ChatTransport};
use claimchat_types::chat::Transcript;
use claimchat_types::config::ClaimchatConfig;
use claimchat_types::error::ChatError;
use claimchat_types::wire::RelayRequest;

use super::error_body::parse_error_message;
use super::openai::OpenAiClient;

/// Where chat requests go.
pub enum Target {
    Relay {
        client: reqwest::Client,
        url: String,
        access_token: Option<SecretString>,
    },
    OpenAi(OpenAiClient),
}

/// HTTP implementation of [`ChatTransport`].
pub struct HttpChatTransport {
    target: Target,
}

impl HttpChatTransport {
    /// Transport posting to the relay.
    ///
    /// Only the connect phase is timed out; a streaming body may stay open
    /// for as long as the model keeps writing.
    pub fn relay(
        url: impl Into<String>,
        access_token: Option<SecretString>,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            target: Target::Relay {
                client,
                url: url.into(),
                access_token,
            },
        })
    }

    /// Transport talking to the completion endpoint directly.
    pub fn direct(upstream: OpenAiClient) -> Self {
        Self {
            target: Target::OpenAi(upstream),
        }
    }

    /// Pick the direct transport if an OpenAI key is available, else the relay.
    pub fn from_config(
        config: &ClaimchatConfig,
        openai_key: Option<SecretString>,
        access_token: Option<SecretString>,
    ) -> Result<Self, reqwest::Error> {
        match openai_key {
            Some(key) => {
                info!(model = %config.openai.model, "using direct completion endpoint");
                Ok(Self::direct(OpenAiClient::new(&config.openai, key)?))
            }
            None => {
                info!(url = %config.relay.url, "using chat relay");
                Self::relay(
                    config.relay.url.clone(),
                    access_token,
                    Duration::from_secs(config.relay.connect_timeout_secs),
                )
            }
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    async fn post(&self, transcript: &Transcript) -> Result<reqwest::Response, reqwest::Error> {
        match &self.target {
            Target::Relay {
                client,
                url,
                access_token,
            } => {
                let body = RelayRequest {
                    messages: transcript.clone(),
                };
                let mut request = client
                    .post(url)
                    .header(ACCEPT, "text/event-stream")
                    .json(&body);
                if let Some(token) = access_token {
                    request = request.bearer_auth(token.expose_secret());
                }
                request.send().await
            }
            Target::OpenAi(upstream) => upstream.send(transcript).await,
        }
    }
}

impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &str {
        match self.target {
            Target::Relay { .. } => "relay",
            Target::OpenAi(_) => "openai",
        }
    }

    async fn open_stream(&self, transcript: &Transcript) -> Result<ByteStream, ChatError> {
        let response = self.post(transcript).await.map_err(|e| ChatError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        into_byte_stream(response).await
    }
}

/// Check the status and hand back the body as a chunk stream.
pub async fn into_byte_stream(response: reqwest::Response) -> Result<ByteStream, ChatError> {
    let status = response.status();
    if !status.is_success() {
        let fallback = status.canonical_reason().unwrap_or("request failed");
        let text = response.text().await.unwrap_or_default();
        let message = parse_error_message(&text, fallback);
        debug!(status = status.as_u16(), %message, "completion request rejected");
        return Err(ChatError::Transport {
            status: Some(status.as_u16()),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
        return Err(ChatError::MissingBody);
    }

    let body = response
        .bytes_stream()
        .map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| ChatError::Stream(e.to_string()))
        });
    Ok(Box::pin(body))
}
