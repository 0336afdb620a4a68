//! Checkpoint repository.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::Checkpoint;
use arcadia_core::{CheckpointId, SessionId};

const TABLE: &str = "checkpoint";

/// Repository over the `checkpoint` table.
pub struct CheckpointStore<'a> {
    db: &'a Database,
}

impl<'a> CheckpointStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a checkpoint row. Idempotent per `(session_id, trigger,
    /// vcs_commit_hash)`: a duplicate insert is a no-op returning the
    /// existing row (invariant C1).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn create(&self, checkpoint: &Checkpoint) -> StorageResult<Checkpoint> {
        if let Some(existing) = self
            .list_by_session(checkpoint.session_id)
            .await?
            .into_iter()
            .find(|c| {
                c.trigger == checkpoint.trigger && c.vcs_commit_hash == checkpoint.vcs_commit_hash
            })
        {
            return Ok(existing);
        }

        let created: Option<Checkpoint> = self
            .db
            .client()
            .create((TABLE, checkpoint.id.get()))
            .content(checkpoint.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch a checkpoint by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: CheckpointId) -> StorageResult<Checkpoint> {
        let row: Option<Checkpoint> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("checkpoint {id}")))
    }

    /// All checkpoints for a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(&self, session_id: SessionId) -> StorageResult<Vec<Checkpoint>> {
        let mut rows: Vec<Checkpoint> = self.db.client().select(TABLE).await?;
        rows.retain(|c| c.session_id == session_id);
        rows.sort_by_key(|c| c.timestamp);
        Ok(rows)
    }

    /// The most recent checkpoint for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn latest(&self, session_id: SessionId) -> StorageResult<Option<Checkpoint>> {
        Ok(self.list_by_session(session_id).await?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckpointTrigger;
    use chrono::Utc;
    use serde_json::json;

    fn sample(id: i64, session_id: i64, commit: &str) -> Checkpoint {
        Checkpoint {
            id: CheckpointId::new(id),
            session_id: SessionId::new(session_id),
            timestamp: Utc::now(),
            trigger: CheckpointTrigger::FeatureComplete,
            vcs_commit_hash: commit.to_string(),
            feature_status_snapshot: json!({}),
            pending_work: None,
            notes: None,
            hot_memory_snapshot: None,
        }
    }

    #[tokio::test]
    async fn create_is_idempotent_per_trigger_and_commit() {
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        let first = store.create(&sample(1, 1, "abc123")).await.unwrap();
        let second = store.create(&sample(2, 1, "abc123")).await.unwrap();
        assert_eq!(first.id, second.id);

        let all = store.list_by_session(SessionId::new(1)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn latest_returns_most_recent() {
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        store.create(&sample(1, 1, "abc123")).await.unwrap();
        store.create(&sample(2, 1, "def456")).await.unwrap();

        let latest = store.latest(SessionId::new(1)).await.unwrap().unwrap();
        assert_eq!(latest.vcs_commit_hash, "def456");
    }
}
