//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `claimchat-core` with raw sqlx
//! queries and a private row struct. The transcript is stored as a JSON
//! array in the `messages` column.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use claimchat_core::chat::repository::ConversationRepository;
use claimchat_types::chat::Transcript;
use claimchat_types::conversation::Conversation;
use claimchat_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    id: String,
    title: String,
    messages: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            messages: row.try_get("messages")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let messages: Transcript = serde_json::from_str(&self.messages).map_err(|e| {
            RepositoryError::Query(format!("invalid messages for conversation {}: {e}", self.id))
        })?;

        Ok(Conversation {
            id: self.id,
            title: self.title,
            messages,
            timestamp: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so `ORDER BY updated_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ConversationRepository for SqliteConversationRepository {
    async fn list(&self) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM conversations ORDER BY updated_at DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let row =
                ConversationRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(row.into_conversation()?);
        }
        Ok(conversations)
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let messages = serde_json::to_string(&conversation.messages)
            .map_err(|e| RepositoryError::Query(format!("failed to encode messages: {e}")))?;

        sqlx::query(
            r#"INSERT INTO conversations (id, title, messages, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   title = excluded.title,
                   messages = excluded.messages,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&conversation.id)
        .bind(&conversation.title)
        .bind(messages)
        .bind(format_datetime(&conversation.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use claimchat_types::chat::Turn;

    async fn test_repo() -> (tempfile::TempDir, SqliteConversationRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteConversationRepository::new(pool))
    }

    fn conversation(id: &str, title: &str, timestamp: DateTime<Utc>) -> Conversation {
        Conversation {
            id: id.to_string(),
            title: title.to_string(),
            messages: Transcript::from(vec![
                Turn::user(title),
                Turn::assistant("Généralement, deux ans."),
            ]),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let (_dir, repo) = test_repo().await;
        let saved = conversation("c1", "Limitation periods", Utc::now());
        repo.save(&saved).await.unwrap();

        let loaded = repo.get("c1").await.unwrap().unwrap();
        assert_eq!(loaded.title, saved.title);
        assert_eq!(loaded.messages, saved.messages);
        assert_eq!(
            loaded.timestamp.timestamp_micros(),
            saved.timestamp.timestamp_micros()
        );
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_id() {
        let (_dir, repo) = test_repo().await;
        let mut conv = conversation("c1", "First", Utc::now());
        repo.save(&conv).await.unwrap();

        conv.title = "Renamed".to_string();
        conv.messages.push(Turn::user("follow-up"));
        repo.save(&conv).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed");
        assert_eq!(all[0].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let (_dir, repo) = test_repo().await;
        let now = Utc::now();
        repo.save(&conversation("old", "Old", now - Duration::hours(2)))
            .await
            .unwrap();
        repo.save(&conversation("new", "New", now)).await.unwrap();
        repo.save(&conversation("mid", "Mid", now - Duration::minutes(5)))
            .await
            .unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, repo) = test_repo().await;
        repo.save(&conversation("c1", "Doomed", Utc::now())).await.unwrap();

        repo.delete("c1").await.unwrap();
        assert!(repo.get("c1").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("c1").await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
