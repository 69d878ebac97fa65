//! Chat session: the single writer of a transcript.
//!
//! `ChatSession` appends the user's turn, opens the response stream through
//! a [`ChatTransport`], and folds every fragment into the transcript as it
//! arrives. After each change a full snapshot is published on a
//! `tokio::sync::watch` channel so readers (a renderer, an autosaver) never
//! see a half-applied update.
//!
//! Exchanges take `&mut self`, so at most one stream per session is in
//! flight. Fragments are applied strictly in arrival order.

use std::time::Instant;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use claimchat_types::chat::{Transcript, Turn};
use claimchat_types::error::ChatError;

use crate::chat::accumulator::TurnAccumulator;
use crate::chat::transport::ChatTransport;
use crate::stream::{self, StreamSignal};

/// How an exchange's stream came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// `data: [DONE]` was received.
    Terminator,
    /// The body ended without a terminator; buffered text was flushed.
    Exhausted,
    /// The caller cancelled; no further reads were issued.
    Cancelled,
}

/// Result of a finished exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Full assistant reply, or `None` if the stream produced no text.
    pub reply: Option<String>,
    pub end: StreamEnd,
    pub fragments: usize,
}

/// Owns the transcript of the active conversation.
pub struct ChatSession<T: ChatTransport> {
    transport: T,
    transcript: Transcript,
    updates: watch::Sender<Transcript>,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Create a session with an empty transcript.
    pub fn new(transport: T) -> Self {
        Self::with_transcript(transport, Transcript::new())
    }

    /// Create a session seeded with an existing transcript.
    pub fn with_transcript(transport: T, transcript: Transcript) -> Self {
        let (updates, _) = watch::channel(transcript.clone());
        Self {
            transport,
            transcript,
            updates,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Subscribe to transcript snapshots. The receiver sees the current
    /// transcript immediately and every change after it.
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.updates.subscribe()
    }

    /// Replace the whole transcript with a saved conversation's turns.
    pub fn load(&mut self, transcript: Transcript) {
        self.transcript = transcript;
        self.publish();
    }

    /// Start over with an empty transcript.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.publish();
    }

    /// Append a user turn and stream the assistant's reply into the transcript.
    ///
    /// On error the user's turn stays; an assistant turn exists only if the
    /// stream delivered at least one fragment before failing.
    pub async fn send_message(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Exchange, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidTranscript("message is empty".to_string()));
        }

        self.transcript.push(Turn::user(text));
        self.publish();
        self.run_exchange(cancel).await
    }

    /// Drop the trailing assistant turn and replay the last user turn.
    ///
    /// The user turn is re-sent as-is, never duplicated.
    pub async fn regenerate(&mut self, cancel: &CancellationToken) -> Result<Exchange, ChatError> {
        let dropped = self.transcript.pop_trailing_assistant();
        if !self.transcript.ends_with_user() {
            if let Some(turn) = dropped {
                self.transcript.push(turn);
            }
            return Err(ChatError::InvalidTranscript(
                "nothing to regenerate: no user turn to replay".to_string(),
            ));
        }

        if dropped.is_some() {
            debug!("dropped trailing assistant turn for regeneration");
            self.publish();
        }
        self.run_exchange(cancel).await
    }

    async fn run_exchange(&mut self, cancel: &CancellationToken) -> Result<Exchange, ChatError> {
        let start = Instant::now();
        let transport = self.transport.name().to_string();
        info!(transport = %transport, turns = self.transcript.len(), "sending transcript");

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("exchange cancelled before the response arrived");
                return Ok(Exchange { reply: None, end: StreamEnd::Cancelled, fragments: 0 });
            }
            opened = self.transport.open_stream(&self.transcript) => opened?,
        };

        let mut signals = stream::fragments(body);
        let mut accumulator = TurnAccumulator::new();
        let mut fragments = 0usize;

        let end = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                next = signals.next() => next,
            };

            match next {
                Some(Ok(StreamSignal::Fragment(text))) => {
                    accumulator.apply(&mut self.transcript, &text);
                    fragments += 1;
                    self.publish();
                }
                Some(Ok(StreamSignal::Done)) => break StreamEnd::Terminator,
                None => break StreamEnd::Exhausted,
                Some(Err(e)) => {
                    warn!(transport = %transport, fragments, error = %e, "stream failed");
                    accumulator.commit();
                    return Err(e);
                }
            }
        };
        drop(signals);

        let reply = accumulator.commit();
        info!(
            transport = %transport,
            fragments,
            reply_chars = reply.as_ref().map_or(0, |r| r.chars().count()),
            end = ?end,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "exchange finished"
        );

        Ok(Exchange {
            reply,
            end,
            fragments,
        })
    }

    fn publish(&self) {
        self.updates.send_replace(self.transcript.clone());
    }
}
