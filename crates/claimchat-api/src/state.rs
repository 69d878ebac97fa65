//! Application state wiring services together.
//!
//! AppState holds what the CLI commands need: the resolved data directory,
//! the loaded config, and the SQLite pool. Services are generic over the
//! core traits; the aliases below pin them to the infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use claimchat_core::chat::service::ConversationService;
use claimchat_core::chat::session::ChatSession;
use claimchat_infra::config::{ACCESS_TOKEN_ENV, OPENAI_API_KEY_ENV, load_config, secret_from_env};
use claimchat_infra::filesystem::{database_url, resolve_data_dir};
use claimchat_infra::http::transport::HttpChatTransport;
use claimchat_infra::sqlite::conversation::SqliteConversationRepository;
use claimchat_infra::sqlite::pool::DatabasePool;
use claimchat_types::chat::Transcript;
use claimchat_types::config::ClaimchatConfig;

pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;

pub type ConcreteChatSession = ChatSession<HttpChatTransport>;

/// Shared state for CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<ClaimchatConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Resolve the data dir, load config, and open the database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("failed to open conversation database")?;

        Ok(Self {
            data_dir,
            config: Arc::new(config),
            db_pool,
        })
    }

    /// A conversation service with no active conversation.
    pub fn conversation_service(&self) -> ConcreteConversationService {
        ConversationService::new(SqliteConversationRepository::new(self.db_pool.clone()))
    }

    /// A chat session seeded with `transcript`, using the direct endpoint
    /// when `OPENAI_API_KEY` is set and the relay otherwise.
    pub fn chat_session(&self, transcript: Transcript) -> anyhow::Result<ConcreteChatSession> {
        let transport = HttpChatTransport::from_config(
            &self.config,
            secret_from_env(OPENAI_API_KEY_ENV),
            secret_from_env(ACCESS_TOKEN_ENV),
        )
        .context("failed to build HTTP client")?;
        Ok(ChatSession::with_transcript(transport, transcript))
    }
}
