//! Slash command parsing for the chat loop.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Replace the last reply with a fresh one.
    Regenerate,
    /// Start a new conversation.
    New,
    /// Find turns containing the text.
    Search(String),
    /// Write the transcript to a text file.
    Export(Option<PathBuf>),
    /// Show the transcript so far.
    History,
    /// Delete the saved copy of this conversation and start over.
    Delete,
    /// Clear the terminal screen.
    Clear,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/regenerate" | "/regen" | "/r" => ChatCommand::Regenerate,
        "/new" => ChatCommand::New,
        "/search" | "/find" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/search requires some text".to_string())
            } else {
                ChatCommand::Search(arg.to_string())
            }
        }
        "/export" => ChatCommand::Export((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "/history" => ChatCommand::History,
        "/delete" => ChatCommand::Delete,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/regenerate", "Ask again for the last reply"),
        ("/new", "Start a new conversation"),
        ("/search TEXT", "Find messages containing TEXT"),
        ("/export [PATH]", "Save the conversation as a text file"),
        ("/history", "Show the conversation so far"),
        ("/delete", "Delete this conversation and start over"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in rows {
        println!("  {:<16} {}", style(name).cyan(), description);
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+C stops a streaming reply, Ctrl+D exits").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_regenerate_aliases() {
        assert_eq!(parse("/regenerate"), Some(ChatCommand::Regenerate));
        assert_eq!(parse("/r"), Some(ChatCommand::Regenerate));
    }

    #[test]
    fn test_parse_search_keeps_argument() {
        assert_eq!(
            parse("/search  limitation period "),
            Some(ChatCommand::Search("limitation period".to_string()))
        );
        assert!(matches!(parse("/search"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_export_optional_path() {
        assert_eq!(parse("/export"), Some(ChatCommand::Export(None)));
        assert_eq!(
            parse("/export notes/claim.txt"),
            Some(ChatCommand::Export(Some(PathBuf::from("notes/claim.txt"))))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("what is a tort?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
