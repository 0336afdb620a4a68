//! Intervention and learned Intervention Pattern repositories (§4.10).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{Intervention, InterventionPattern};
use arcadia_core::InterventionId;

const INTERVENTION_TABLE: &str = "intervention";
const PATTERN_TABLE: &str = "intervention_pattern";

/// Repository over the `intervention` and `intervention_pattern` tables.
pub struct InterventionStore<'a> {
    db: &'a Database,
}

impl<'a> InterventionStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record a resolved human response.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn record(&self, intervention: &Intervention) -> StorageResult<Intervention> {
        let created: Option<Intervention> = self
            .db
            .client()
            .create((INTERVENTION_TABLE, intervention.id.get()))
            .content(intervention.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// All interventions sharing a signature, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_signature(&self, signature: &str) -> StorageResult<Vec<Intervention>> {
        let mut rows: Vec<Intervention> = self.db.client().select(INTERVENTION_TABLE).await?;
        rows.retain(|i| i.signature == signature);
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }

    /// The learned pattern for a signature, if one has been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_pattern(&self, signature: &str) -> StorageResult<Option<InterventionPattern>> {
        let row: Option<InterventionPattern> =
            self.db.client().select((PATTERN_TABLE, signature)).await?;
        Ok(row)
    }

    /// Insert or replace the learned pattern for a signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn put_pattern(
        &self,
        pattern: &InterventionPattern,
    ) -> StorageResult<InterventionPattern> {
        let updated: Option<InterventionPattern> = self
            .db
            .client()
            .update((PATTERN_TABLE, pattern.signature.clone()))
            .content(pattern.clone())
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => {
                let created: Option<InterventionPattern> = self
                    .db
                    .client()
                    .create((PATTERN_TABLE, pattern.signature.clone()))
                    .content(pattern.clone())
                    .await?;
                created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::SessionId;
    use chrono::Utc;

    #[tokio::test]
    async fn put_pattern_then_get_round_trips() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        let pattern = InterventionPattern {
            signature: "force_push_to_main".into(),
            preferred_response: "deny".into(),
            confidence: 0.9,
            sample_count: 5,
            min_confidence_for_auto: 0.8,
            auto_apply: true,
        };
        store.put_pattern(&pattern).await.unwrap();

        let fetched = store
            .get_pattern("force_push_to_main")
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.auto_apply);
    }

    #[tokio::test]
    async fn list_by_signature_orders_most_recent_first() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        let base = Intervention {
            id: InterventionId::new(1),
            injection_point_id: arcadia_core::InjectionPointId::new(1),
            session_id: SessionId::new(1),
            signature: "sig".into(),
            human_response: "deny".into(),
            timestamp: Utc::now(),
        };
        let mut second = base.clone();
        second.id = InterventionId::new(2);
        second.timestamp = base.timestamp + chrono::Duration::seconds(1);

        store.record(&base).await.unwrap();
        store.record(&second).await.unwrap();

        let rows = store.list_by_signature("sig").await.unwrap();
        assert_eq!(rows[0].id, InterventionId::new(2));
    }
}
