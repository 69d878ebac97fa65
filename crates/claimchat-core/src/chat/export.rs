//! Plain-text export and search over a transcript.

use chrono::Utc;

use claimchat_types::chat::{MessageRole, Transcript, Turn};
use claimchat_types::error::ChatError;

const TURN_SEPARATOR: &str = "\n---\n\n";

fn label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Assistant => "AI Assistant",
    }
}

/// Render a transcript as plain text, one labelled block per turn.
pub fn export_text(transcript: &Transcript) -> Result<String, ChatError> {
    if transcript.is_empty() {
        return Err(ChatError::InvalidTranscript(
            "no messages to export".to_string(),
        ));
    }

    Ok(transcript
        .turns()
        .iter()
        .map(|turn| format!("{}:\n{}\n", label(turn.role), turn.content))
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR))
}

/// File name for an export made now: `conversation-{unix_millis}.txt`.
pub fn default_export_file_name() -> String {
    format!("conversation-{}.txt", Utc::now().timestamp_millis())
}

/// Case-insensitive substring search over turn contents.
///
/// Returns matching turns with their position. A blank query matches nothing.
pub fn search<'a>(transcript: &'a Transcript, query: &str) -> Vec<(usize, &'a Turn)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    transcript
        .turns()
        .iter()
        .enumerate()
        .filter(|(_, turn)| turn.content.to_lowercase().contains(&query))
        .collect()
}
