//! claimchat CLI and relay server entry point.
//!
//! Binary name: `claimchat`
//!
//! Parses CLI arguments, sets up tracing, then dispatches to the command
//! handler or starts the relay server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use claimchat_infra::config::load_config;
use claimchat_infra::filesystem::resolve_data_dir;
use claimchat_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands, ConversationCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,claimchat_core=debug,claimchat_infra=debug",
        _ => "trace",
    };
    if let Err(e) = init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "claimchat", &mut std::io::stdout());
        return Ok(());
    }

    // The relay only needs config, not the conversation database
    if let Commands::Serve { port, host } = &cli.command {
        let config = load_config(&resolve_data_dir()).await;
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        return http::serve(&config, &host, port).await;
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat { resume } => {
            cli::chat::loop_runner::run_chat_loop(&state, resume).await?;
        }
        Commands::Ask { text, no_save } => {
            cli::ask::ask(&state, &text.join(" "), !no_save, cli.quiet).await?;
        }
        Commands::Conversations { action } => match action {
            ConversationCommand::List => {
                cli::conversation::list_conversations(&state, cli.json).await?;
            }
            ConversationCommand::Show { id } => {
                cli::conversation::show_conversation(&state, &id, cli.json).await?;
            }
            ConversationCommand::Delete { id } => {
                cli::conversation::delete_conversation(&state, &id).await?;
            }
            ConversationCommand::Export { id, output } => {
                cli::conversation::export_conversation(&state, &id, output).await?;
            }
        },
        Commands::Serve { .. } | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
