//! Folding text fragments into the transcript.
//!
//! Two-phase state: `Idle` until the first fragment of an exchange, then
//! `Accumulating` with the position of the assistant turn being written.
//! Every fragment leaves the transcript holding one assistant turn for the
//! exchange whose content is all fragments so far, in arrival order.

use claimchat_types::chat::{Transcript, Turn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum TurnAccumulator {
    #[default]
    Idle,
    Accumulating {
        /// Position of the assistant turn in the transcript.
        index: usize,
        text: String,
    },
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Text accumulated so far, if any fragment has been applied.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Accumulating { text, .. } => Some(text),
        }
    }

    /// Append `fragment` and write the running text into the transcript.
    ///
    /// On the first fragment, an existing trailing assistant turn is reused
    /// in place; otherwise a new assistant turn is appended.
    pub fn apply(&mut self, transcript: &mut Transcript, fragment: &str) {
        match self {
            Self::Idle => {
                let text = fragment.to_string();
                let index = match transcript.last() {
                    Some(last) if last.is_assistant() => {
                        let index = transcript.len() - 1;
                        transcript.set_content(index, &text);
                        index
                    }
                    _ => {
                        transcript.push(Turn::assistant(text.clone()));
                        transcript.len() - 1
                    }
                };
                *self = Self::Accumulating { index, text };
            }
            Self::Accumulating { index, text } => {
                text.push_str(fragment);
                if !transcript.set_content(*index, text) {
                    // The transcript was truncated underneath us; re-anchor.
                    transcript.push(Turn::assistant(text.clone()));
                    *index = transcript.len() - 1;
                }
            }
        }
    }

    /// Finish the exchange, returning the full reply if any text arrived.
    pub fn commit(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Accumulating { text, .. } => Some(text),
        }
    }
}
