//! CLI command definitions for the `claimchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod conversation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Streaming chat assistant for Canadian personal injury questions.
#[derive(Parser)]
#[command(name = "claimchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat {
        /// Continue a saved conversation by id.
        #[arg(long)]
        resume: Option<String>,
    },

    /// Ask a single question and stream the answer.
    Ask {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Do not save the exchange as a conversation.
        #[arg(long)]
        no_save: bool,
    },

    /// Manage saved conversations.
    #[command(alias = "conv")]
    Conversations {
        #[command(subcommand)]
        action: ConversationCommand,
    },

    /// Run the chat relay server.
    Serve {
        /// Port to listen on (defaults to `[server] port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConversationCommand {
    /// List saved conversations, most recent first.
    #[command(alias = "ls")]
    List,

    /// Print a saved conversation.
    Show {
        /// Conversation id.
        id: String,
    },

    /// Delete a saved conversation.
    #[command(alias = "rm")]
    Delete {
        /// Conversation id.
        id: String,
    },

    /// Export a saved conversation as plain text.
    Export {
        /// Conversation id.
        id: String,

        /// Output file (defaults to `conversation-<unix millis>.txt`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::parse_from(["claimchat", "ask", "how", "long", "--no-save"]);
        match cli.command {
            Commands::Ask { text, no_save } => {
                assert_eq!(text.join(" "), "how long");
                assert!(no_save);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["claimchat", "conversations", "list", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Conversations {
                action: ConversationCommand::List
            }
        ));
    }
}
