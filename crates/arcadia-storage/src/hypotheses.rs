//! Hypothesis repository.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{Hypothesis, HypothesisStatus};
use arcadia_core::{HypothesisId, SessionId};

const TABLE: &str = "hypothesis";

/// Repository over the `hypothesis` table.
pub struct HypothesisStore<'a> {
    db: &'a Database,
}

impl<'a> HypothesisStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new hypothesis row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn create(&self, hypothesis: &Hypothesis) -> StorageResult<Hypothesis> {
        let created: Option<Hypothesis> = self
            .db
            .client()
            .create((TABLE, hypothesis.id.get()))
            .content(hypothesis.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Resolve a hypothesis to `Confirmed` or `Refuted`, appending the
    /// evidence that settled it.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the update fails.
    pub async fn resolve(
        &self,
        id: HypothesisId,
        status: HypothesisStatus,
        evidence: String,
    ) -> StorageResult<Hypothesis> {
        let row: Option<Hypothesis> = self.db.client().select((TABLE, id.get())).await?;
        let mut hypothesis =
            row.ok_or_else(|| StorageError::NotFound(format!("hypothesis {id}")))?;
        hypothesis.status = status;
        hypothesis.evidence.push(evidence);

        let updated: Option<Hypothesis> = self
            .db
            .client()
            .update((TABLE, id.get()))
            .content(hypothesis.clone())
            .await?;
        updated.ok_or_else(|| StorageError::NotFound(format!("hypothesis {id}")))
    }

    /// All hypotheses recorded during a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(&self, session_id: SessionId) -> StorageResult<Vec<Hypothesis>> {
        let mut rows: Vec<Hypothesis> = self.db.client().select(TABLE).await?;
        rows.retain(|h| h.session_id == session_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn resolve_appends_evidence_and_updates_status() {
        let db = Database::connect_memory().await.unwrap();
        let store = HypothesisStore::new(&db);
        let hypothesis = Hypothesis {
            id: HypothesisId::new(1),
            session_id: SessionId::new(1),
            timestamp: Utc::now(),
            statement: "build fails due to stale lockfile".into(),
            confidence: 0.4,
            status: HypothesisStatus::Open,
            evidence: vec![],
        };
        store.create(&hypothesis).await.unwrap();

        let resolved = store
            .resolve(
                HypothesisId::new(1),
                HypothesisStatus::Confirmed,
                "regenerating lockfile fixed the build".into(),
            )
            .await
            .unwrap();
        assert_eq!(resolved.status, HypothesisStatus::Confirmed);
        assert_eq!(resolved.evidence.len(), 1);
    }
}
