//! Turn and transcript types.
//!
//! A [`Transcript`] is the ordered list of [`Turn`]s for one conversation.
//! Insertion order is significant; roles need not strictly alternate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One message in a conversation, tagged with its speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Ordered sequence of turns for one chat session.
///
/// Serializes transparently as a JSON array of turns, which is also the
/// shape of the `messages` field sent to the completion endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    /// Overwrite the content of the turn at `index`, keeping its position.
    ///
    /// Returns `false` if `index` is out of bounds.
    pub fn set_content(&mut self, index: usize, content: &str) -> bool {
        match self.0.get_mut(index) {
            Some(turn) => {
                turn.content.clear();
                turn.content.push_str(content);
                true
            }
            None => false,
        }
    }

    /// Whether the transcript is in a state that may be sent to the transport.
    pub fn ends_with_user(&self) -> bool {
        self.0
            .last()
            .is_some_and(|t| t.role == MessageRole::User)
    }

    /// Drop the last turn if it was spoken by the assistant.
    pub fn pop_trailing_assistant(&mut self) -> Option<Turn> {
        if self.0.last().is_some_and(Turn::is_assistant) {
            self.0.pop()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self(turns)
    }
}
