//! ConversationRepository trait definition.
//!
//! The keyed local store for saved conversations. Injected into the
//! presentation layer instead of being reached as ambient storage.

use claimchat_types::conversation::Conversation;
use claimchat_types::error::RepositoryError;

/// Repository trait for conversation persistence.
///
/// Implementations live in claimchat-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// List all conversations, most recent first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Get one conversation by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Insert or replace a conversation keyed by its id.
    fn save(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a conversation. Returns `NotFound` if the id is unknown.
    fn delete(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
