//! Saved conversation commands: list, show, delete, export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use claimchat_core::chat::export::{default_export_file_name, export_text};
use claimchat_types::chat::MessageRole;

use crate::state::AppState;

/// Longest title shown in the list table, in characters.
const TITLE_DISPLAY_CHARS: usize = 40;

/// List saved conversations, most recent first.
///
/// # Examples
///
/// ```bash
/// claimchat conversations list
/// claimchat conversations list --json
/// ```
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.conversation_service().list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No saved conversations. Start one with: {}",
            style("i").blue().bold(),
            style("claimchat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
    ]);

    for conversation in &conversations {
        let title = if conversation.title.chars().count() > TITLE_DISPLAY_CHARS {
            let head: String = conversation
                .title
                .chars()
                .take(TITLE_DISPLAY_CHARS - 3)
                .collect();
            format!("{head}...")
        } else {
            conversation.title.clone()
        };

        table.add_row(vec![
            Cell::new(&conversation.id).fg(Color::DarkGrey),
            Cell::new(title).fg(Color::Cyan),
            Cell::new(
                conversation
                    .timestamp
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            )
            .fg(Color::White),
            Cell::new(conversation.messages.len().to_string()).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print every turn of a saved conversation.
pub async fn show_conversation(state: &AppState, id: &str, json: bool) -> Result<()> {
    let conversation = state
        .conversation_service()
        .get(id)
        .await?
        .with_context(|| format!("Conversation '{id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&conversation.title).cyan().bold());
    println!(
        "  {}",
        style(conversation.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")).dim()
    );
    println!();
    for turn in conversation.messages.turns() {
        let label = match turn.role {
            MessageRole::User => style("You").green().bold(),
            MessageRole::Assistant => style("AI Assistant").cyan().bold(),
        };
        println!("  {label}");
        for line in turn.content.lines() {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}

pub async fn delete_conversation(state: &AppState, id: &str) -> Result<()> {
    state
        .conversation_service()
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete conversation '{id}'"))?;

    println!();
    println!("  {} Deleted conversation {}", style("✓").green().bold(), style(id).cyan());
    println!();
    Ok(())
}

/// Write a saved conversation as plain text.
pub async fn export_conversation(state: &AppState, id: &str, output: Option<PathBuf>) -> Result<()> {
    let conversation = state
        .conversation_service()
        .get(id)
        .await?
        .with_context(|| format!("Conversation '{id}' not found"))?;

    let text = export_text(&conversation.messages)?;
    let path = output.unwrap_or_else(|| PathBuf::from(default_export_file_name()));
    tokio::fs::write(&path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!();
    println!(
        "  {} Exported '{}' to {}",
        style("✓").green().bold(),
        conversation.title,
        style(path.display()).cyan()
    );
    println!();
    Ok(())
}
