//! Chat relay server.
//!
//! Accepts `{ messages }` from clients that do not hold an OpenAI key,
//! forwards them upstream with the system prompt prepended, and streams the
//! upstream event stream back unchanged.

pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use console::style;
use tracing::{info, warn};

use claimchat_infra::config::{OPENAI_API_KEY_ENV, RELAY_API_KEY_ENV, secret_from_env};
use claimchat_infra::http::openai::OpenAiClient;
use claimchat_types::config::ClaimchatConfig;

/// State shared by relay handlers.
#[derive(Clone)]
pub struct RelayState {
    /// `None` when no upstream key is configured; every chat request then
    /// fails with a 500 explaining why.
    pub upstream: Option<Arc<OpenAiClient>>,
}

impl RelayState {
    /// Build the upstream client from `CUSTOM_OPENAI_API_KEY`, falling back
    /// to `OPENAI_API_KEY`.
    pub fn from_env(config: &ClaimchatConfig) -> anyhow::Result<Self> {
        let key = secret_from_env(RELAY_API_KEY_ENV).or_else(|| secret_from_env(OPENAI_API_KEY_ENV));
        let upstream = match key {
            Some(key) => Some(Arc::new(OpenAiClient::new(&config.openai, key)?)),
            None => {
                warn!(
                    "neither {RELAY_API_KEY_ENV} nor {OPENAI_API_KEY_ENV} is set; chat requests will fail"
                );
                None
            }
        };
        Ok(Self { upstream })
    }
}

/// Bind and run the relay until Ctrl+C or SIGTERM.
pub async fn serve(config: &ClaimchatConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let state = RelayState::from_env(config)?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, model = %config.openai.model, "relay listening");

    println!(
        "  {} Chat relay listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}/functions/v1/chat")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    axum::serve(listener, router::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Relay stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
