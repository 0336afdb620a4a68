//! Decision repository.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::Decision;
use arcadia_core::{DecisionId, SessionId};

const TABLE: &str = "decision";

/// Repository over the `decision` table.
pub struct DecisionStore<'a> {
    db: &'a Database,
}

impl<'a> DecisionStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new decision row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn create(&self, decision: &Decision) -> StorageResult<Decision> {
        let created: Option<Decision> = self
            .db
            .client()
            .create((TABLE, decision.id.get()))
            .content(decision.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch a decision by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: DecisionId) -> StorageResult<Decision> {
        let row: Option<Decision> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("decision {id}")))
    }

    /// All decisions recorded during a session, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(&self, session_id: SessionId) -> StorageResult<Vec<Decision>> {
        let mut rows: Vec<Decision> = self.db.client().select(TABLE).await?;
        rows.retain(|d| d.session_id == session_id);
        rows.sort_by_key(|d| d.timestamp);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn create_then_list_by_session() {
        let db = Database::connect_memory().await.unwrap();
        let store = DecisionStore::new(&db);
        let decision = Decision {
            id: DecisionId::new(1),
            session_id: SessionId::new(1),
            timestamp: Utc::now(),
            summary: "chose option B".into(),
            rationale: Some("lower risk".into()),
            related_feature: Some(3),
        };
        store.create(&decision).await.unwrap();

        let rows = store.list_by_session(SessionId::new(1)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "chose option B");
    }
}
