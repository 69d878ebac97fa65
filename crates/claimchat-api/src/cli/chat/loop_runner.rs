//! Main chat loop orchestration.
//!
//! Reads input, dispatches slash commands, streams replies through the
//! session, and autosaves the transcript after every exchange.

use std::path::PathBuf;

use anyhow::Context;
use console::style;
use tracing::{info, warn};

use claimchat_core::chat::export::{default_export_file_name, export_text, search};
use claimchat_core::chat::session::{ChatSession, Exchange};
use claimchat_core::chat::transport::ChatTransport;
use claimchat_types::chat::{MessageRole, Transcript};
use claimchat_types::error::ChatError;

use crate::state::{AppState, ConcreteConversationService};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::printer::{ASSISTANT_LABEL, Request, stream_reply};

/// Run the interactive chat loop, optionally resuming a saved conversation.
pub async fn run_chat_loop(state: &AppState, resume: Option<String>) -> anyhow::Result<()> {
    let mut conversations = state.conversation_service();

    let (transcript, resumed_title) = match resume {
        Some(id) => {
            let conversation = conversations
                .open(&id)
                .await
                .with_context(|| format!("Conversation '{id}' not found"))?;
            (conversation.messages, Some(conversation.title))
        }
        None => (Transcript::new(), None),
    };

    let mut session = state.chat_session(transcript)?;
    print_welcome_banner(
        session.transport().name(),
        resumed_title.as_deref(),
        &state.data_dir.display().to_string(),
    );
    if resumed_title.is_some() {
        print_history(session.transcript());
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Chat ended.").dim());
                    break;
                }
                ChatCommand::Regenerate => {
                    let result =
                        stream_reply(&mut session, Request::Regenerate, Some(&mut chat_input), false)
                            .await;
                    finish_exchange(&mut conversations, &session, result).await;
                }
                ChatCommand::New => {
                    session.clear();
                    conversations.start_new();
                    println!("\n  {}\n", style("Started a new conversation.").dim());
                }
                ChatCommand::Search(query) => print_search(session.transcript(), &query),
                ChatCommand::Export(path) => export(session.transcript(), path).await,
                ChatCommand::History => print_history(session.transcript()),
                ChatCommand::Delete => match conversations.active_id().map(str::to_string) {
                    Some(id) => match conversations.delete(&id).await {
                        Ok(_) => {
                            session.clear();
                            println!(
                                "\n  {} Conversation deleted. Started a new one.\n",
                                style("✓").green().bold()
                            );
                        }
                        Err(e) => println!("\n  {} Delete failed: {e}\n", style("!").red().bold()),
                    },
                    None => println!(
                        "\n  {} This conversation has not been saved yet.\n",
                        style("i").blue().bold()
                    ),
                },
                ChatCommand::Unknown(cmd_name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(cmd_name).dim()
                ),
            }
            continue;
        }

        let result =
            stream_reply(&mut session, Request::Send(&text), Some(&mut chat_input), false).await;
        finish_exchange(&mut conversations, &session, result).await;
    }

    chat_input.flush();
    Ok(())
}

/// Report an exchange's outcome and autosave the transcript.
///
/// The transcript is saved even when the exchange failed, so the user's
/// question is not lost.
async fn finish_exchange<T: ChatTransport>(
    conversations: &mut ConcreteConversationService,
    session: &ChatSession<T>,
    result: Result<Exchange, ChatError>,
) {
    if let Err(e) = &result {
        eprintln!("\n  {} {e}", style("!").red().bold());
        if !matches!(e, ChatError::InvalidTranscript(_)) {
            eprintln!(
                "  {}",
                style("Type /regenerate to retry, /exit to quit.").dim()
            );
        }
        eprintln!();
    }

    match conversations.save_transcript(session.transcript()).await {
        Ok(Some(saved)) => info!(conversation_id = %saved.id, turns = saved.messages.len(), "conversation saved"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to save conversation"),
    }
}

fn role_label(role: MessageRole) -> console::StyledObject<&'static str> {
    match role {
        MessageRole::User => style("You").green().bold(),
        MessageRole::Assistant => style(ASSISTANT_LABEL).cyan().bold(),
    }
}

fn print_history(transcript: &Transcript) {
    println!();
    if transcript.is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for turn in transcript.turns() {
        println!("  {}", role_label(turn.role));
        for line in turn.content.lines() {
            println!("    {line}");
        }
        println!();
    }
}

fn print_search(transcript: &Transcript, query: &str) {
    let hits = search(transcript, query);
    println!();
    if hits.is_empty() {
        println!("  {} No messages match '{}'.", style("i").blue().bold(), query);
        println!();
        return;
    }

    for (index, turn) in &hits {
        let preview: String = turn.content.chars().take(100).collect();
        let ellipsis = if turn.content.chars().count() > 100 { "..." } else { "" };
        println!(
            "  {} {} {}{}",
            style(format!("#{}", index + 1)).dim(),
            role_label(turn.role),
            preview.replace('\n', " "),
            ellipsis
        );
    }
    println!();
    println!(
        "  {} match{}",
        style(hits.len()).bold(),
        if hits.len() == 1 { "" } else { "es" }
    );
    println!();
}

async fn export(transcript: &Transcript, path: Option<PathBuf>) {
    let text = match export_text(transcript) {
        Ok(text) => text,
        Err(e) => {
            println!("\n  {} {e}\n", style("!").yellow().bold());
            return;
        }
    };

    let path = path.unwrap_or_else(|| PathBuf::from(default_export_file_name()));
    match tokio::fs::write(&path, text).await {
        Ok(()) => println!(
            "\n  {} Exported to {}\n",
            style("✓").green().bold(),
            style(path.display()).cyan()
        ),
        Err(e) => println!(
            "\n  {} Failed to write {}: {e}\n",
            style("!").red().bold(),
            path.display()
        ),
    }
}
