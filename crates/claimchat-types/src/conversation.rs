//! Persisted conversation records.
//!
//! A conversation is a titled, timestamped snapshot of a transcript kept in
//! the local store. The chat core never reads these directly; it only ever
//! hands over or receives a [`Transcript`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Transcript;

/// Maximum number of characters of the first turn used as a title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Title used when the transcript has no usable first turn.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// A saved conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Transcript,
    pub timestamp: DateTime<Utc>,
}

/// Derive a conversation title from the first turn of a transcript.
///
/// Truncates on character boundaries, never in the middle of a code point.
pub fn derive_title(transcript: &Transcript) -> String {
    let title: String = transcript
        .turns()
        .first()
        .map(|t| t.content.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_default();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Turn;

    #[test]
    fn test_title_from_first_turn() {
        let transcript = Transcript::from(vec![
            Turn::user("How long do I have to file a claim in Ontario?"),
            Turn::assistant("Generally two years."),
        ]);
        assert_eq!(
            derive_title(&transcript),
            "How long do I have to file a claim in Ontario?"
        );
    }

    #[test]
    fn test_title_truncated_to_fifty_chars() {
        let long = "é".repeat(80);
        let transcript = Transcript::from(vec![Turn::user(long)]);
        let title = derive_title(&transcript);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_title_defaults_when_empty() {
        assert_eq!(derive_title(&Transcript::new()), DEFAULT_TITLE);
        let transcript = Transcript::from(vec![Turn::user("")]);
        assert_eq!(derive_title(&transcript), DEFAULT_TITLE);
    }
}
