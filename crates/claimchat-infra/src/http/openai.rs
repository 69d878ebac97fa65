//! Upstream client for the OpenAI chat completions endpoint.
//!
//! Builds the streaming request (system prompt first, then the transcript)
//! and retries attempts answered with HTTP 429 using a linear back-off.
//! The API key is held in a [`SecretString`] and only exposed when building
//! the `Authorization` header.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use claimchat_types::chat::Transcript;
use claimchat_types::config::OpenAiConfig;
use claimchat_types::wire::{CompletionRequest, UpstreamMessage};

/// Client for `{base_url}/chat/completions`.
///
/// Does not derive Debug so the key can never end up in logs.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_completion_tokens: u32,
    max_attempts: u32,
    system_prompt: String,
    retry_step: Duration,
}

impl OpenAiClient {
    /// Delay added per failed attempt: attempt `n` waits `n × RETRY_STEP`.
    pub const RETRY_STEP: Duration = Duration::from_secs(1);

    pub fn new(config: &OpenAiConfig, api_key: SecretString) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
            max_attempts: config.max_attempts.max(1),
            system_prompt: config.system_prompt.clone(),
            retry_step: Self::RETRY_STEP,
        })
    }

    /// Override the back-off step (tests use a few milliseconds).
    pub fn with_retry_step(mut self, step: Duration) -> Self {
        self.retry_step = step;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Streaming completion request for `transcript`, system prompt first.
    pub fn build_request(&self, transcript: &Transcript) -> CompletionRequest {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(UpstreamMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });
        messages.extend(transcript.turns().iter().map(|turn| UpstreamMessage {
            role: turn.role.to_string(),
            content: turn.content.clone(),
        }));

        CompletionRequest {
            model: self.model.clone(),
            messages,
            stream: true,
            max_completion_tokens: self.max_completion_tokens,
        }
    }

    /// POST the transcript upstream.
    ///
    /// An attempt answered with 429 is retried after `attempt × step` until
    /// `max_attempts` is reached; the last response is returned whatever its
    /// status. Any other status is returned to the caller untouched.
    pub async fn send(&self, transcript: &Transcript) -> Result<reqwest::Response, reqwest::Error> {
        let body = self.build_request(transcript);
        let url = self.url();
        let mut attempt = 1;

        loop {
            debug!(model = %self.model, attempt, turns = transcript.len(), "posting completion request");
            let response = self
                .client
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .json(&body)
                .send()
                .await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS || attempt >= self.max_attempts {
                return Ok(response);
            }

            let delay = self.retry_step * attempt;
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                "upstream rate limited, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
