//! Conversation service: autosave and lookup of saved transcripts.
//!
//! ConversationService sits between a chat session and the
//! ConversationRepository. It decides when a transcript is worth saving,
//! assigns ids and titles, and keeps track of which saved conversation the
//! active transcript belongs to.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use claimchat_types::chat::Transcript;
use claimchat_types::conversation::{Conversation, derive_title};
use claimchat_types::error::RepositoryError;

use crate::chat::repository::ConversationRepository;

/// Orchestrates conversation persistence.
///
/// Generic over `ConversationRepository` so claimchat-core never depends on
/// claimchat-infra.
pub struct ConversationService<R: ConversationRepository> {
    repo: R,
    active_id: Option<String>,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            active_id: None,
        }
    }

    /// Id of the saved conversation the active transcript belongs to.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Forget the active conversation. The next save creates a new record.
    pub fn start_new(&mut self) {
        self.active_id = None;
    }

    /// Save the active transcript.
    ///
    /// Empty transcripts are not saved. The first save of a conversation
    /// assigns a fresh id; later saves overwrite the same record.
    pub async fn save_transcript(
        &mut self,
        transcript: &Transcript,
    ) -> Result<Option<Conversation>, RepositoryError> {
        if transcript.is_empty() {
            debug!("skipping save of empty transcript");
            return Ok(None);
        }

        let id = match &self.active_id {
            Some(id) => id.clone(),
            None => Uuid::now_v7().to_string(),
        };

        let conversation = Conversation {
            id: id.clone(),
            title: derive_title(transcript),
            messages: transcript.clone(),
            timestamp: Utc::now(),
        };
        self.repo.save(&conversation).await?;

        if self.active_id.is_none() {
            info!(conversation_id = %id, title = %conversation.title, "conversation created");
        }
        self.active_id = Some(id);
        Ok(Some(conversation))
    }

    /// List saved conversations, most recent first.
    pub async fn list(&self) -> Result<Vec<Conversation>, RepositoryError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Conversation>, RepositoryError> {
        self.repo.get(id).await
    }

    /// Load a saved conversation and make it the active one.
    ///
    /// Returns `NotFound` if the id is unknown; the active id is unchanged
    /// in that case.
    pub async fn open(&mut self, id: &str) -> Result<Conversation, RepositoryError> {
        let conversation = self.repo.get(id).await?.ok_or(RepositoryError::NotFound)?;
        self.active_id = Some(conversation.id.clone());
        Ok(conversation)
    }

    /// Delete a saved conversation.
    ///
    /// Returns `true` if the deleted conversation was the active one, in
    /// which case the caller should start a new chat.
    pub async fn delete(&mut self, id: &str) -> Result<bool, RepositoryError> {
        self.repo.delete(id).await?;
        info!(conversation_id = %id, "conversation deleted");

        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimchat_types::chat::Turn;
    use claimchat_types::conversation::DEFAULT_TITLE;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<HashMap<String, Conversation>>,
    }

    impl ConversationRepository for MemoryRepo {
        async fn list(&self) -> Result<Vec<Conversation>, RepositoryError> {
            let mut all: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(all)
        }

        async fn get(&self, id: &str) -> Result<Option<Conversation>, RepositoryError> {
            Ok(self.rows.lock().unwrap().get(id).cloned())
        }

        async fn save(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(conversation.id.clone(), conversation.clone());
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
            match self.rows.lock().unwrap().remove(id) {
                Some(_) => Ok(()),
                None => Err(RepositoryError::NotFound),
            }
        }
    }

    fn exchange(q: &str, a: &str) -> Transcript {
        Transcript::from(vec![Turn::user(q), Turn::assistant(a)])
    }

    #[tokio::test]
    async fn test_empty_transcript_not_saved() {
        let mut service = ConversationService::new(MemoryRepo::default());
        assert!(service.save_transcript(&Transcript::new()).await.unwrap().is_none());
        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(service.active_id(), None);
    }

    #[tokio::test]
    async fn test_first_save_assigns_id_and_later_saves_reuse_it() {
        let mut service = ConversationService::new(MemoryRepo::default());

        let first = service
            .save_transcript(&Transcript::from(vec![Turn::user("Q")]))
            .await
            .unwrap()
            .unwrap();
        let second = service
            .save_transcript(&exchange("Q", "A"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.active_id(), Some(first.id.as_str()));

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].messages.len(), 2);
        assert_eq!(all[0].title, "Q");
    }

    #[tokio::test]
    async fn test_new_chat_creates_separate_record() {
        let mut service = ConversationService::new(MemoryRepo::default());
        service.save_transcript(&exchange("one", "1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service.start_new();
        service.save_transcript(&exchange("two", "2")).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "two");
    }

    #[tokio::test]
    async fn test_open_sets_active_id() {
        let mut service = ConversationService::new(MemoryRepo::default());
        let saved = service
            .save_transcript(&exchange("Q", "A"))
            .await
            .unwrap()
            .unwrap();
        service.start_new();

        let opened = service.open(&saved.id).await.unwrap();
        assert_eq!(opened.messages, exchange("Q", "A"));
        assert_eq!(service.active_id(), Some(saved.id.as_str()));

        let err = service.open("missing").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(service.active_id(), Some(saved.id.as_str()));
    }

    #[tokio::test]
    async fn test_delete_active_conversation_resets() {
        let mut service = ConversationService::new(MemoryRepo::default());
        let saved = service
            .save_transcript(&exchange("Q", "A"))
            .await
            .unwrap()
            .unwrap();

        assert!(service.delete(&saved.id).await.unwrap());
        assert_eq!(service.active_id(), None);
        assert!(matches!(
            service.delete(&saved.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_title_falls_back_for_blank_first_turn() {
        let mut service = ConversationService::new(MemoryRepo::default());
        let saved = service
            .save_transcript(&Transcript::from(vec![Turn::user("")]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.title, DEFAULT_TITLE);
    }
}
