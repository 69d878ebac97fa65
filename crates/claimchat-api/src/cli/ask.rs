//! One-shot question: stream a single reply to stdout.

use console::style;
use tracing::warn;

use claimchat_types::chat::Transcript;

use crate::state::AppState;

use super::chat::printer::{Request, stream_reply};

/// Ask `question`, print the streamed reply, and optionally save the exchange.
///
/// Ctrl+C stops the reply; the partial answer is kept and saved.
///
/// # Examples
///
/// ```bash
/// claimchat ask "How long do I have to sue after a car accident in Ontario?"
/// claimchat ask --quiet --no-save "What is a tort?" > answer.txt
/// ```
pub async fn ask(state: &AppState, question: &str, save: bool, quiet: bool) -> anyhow::Result<()> {
    let mut session = state.chat_session(Transcript::new())?;

    let result = stream_reply(&mut session, Request::Send(question), None, quiet).await;

    if save {
        let mut conversations = state.conversation_service();
        match conversations.save_transcript(session.transcript()).await {
            Ok(Some(saved)) if !quiet => println!(
                "  {} {}",
                style("Saved as").dim(),
                style(&saved.id).cyan()
            ),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to save conversation"),
        }
    }

    result?;
    Ok(())
}
