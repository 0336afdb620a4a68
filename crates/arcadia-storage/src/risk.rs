//! Risk pattern repository (§4.4).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::RiskPattern;

const TABLE: &str = "risk_pattern";

/// Repository over the `risk_pattern` table.
pub struct RiskPatternStore<'a> {
    db: &'a Database,
}

impl<'a> RiskPatternStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert or replace a risk pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn put(&self, pattern: &RiskPattern) -> StorageResult<RiskPattern> {
        let updated: Option<RiskPattern> = self
            .db
            .client()
            .update((TABLE, pattern.id.clone()))
            .content(pattern.clone())
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => {
                let created: Option<RiskPattern> = self
                    .db
                    .client()
                    .create((TABLE, pattern.id.clone()))
                    .content(pattern.clone())
                    .await?;
                created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
            }
        }
    }

    /// Every known risk pattern, loaded once at supervisor startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> StorageResult<Vec<RiskPattern>> {
        let rows: Vec<RiskPattern> = self.db.client().select(TABLE).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_list_round_trips() {
        let db = Database::connect_memory().await.unwrap();
        let store = RiskPatternStore::new(&db);
        let pattern = RiskPattern {
            id: "rm-rf".into(),
            pattern: "rm -rf".into(),
            risk_level: 5,
            reversible: false,
            affects_source_of_truth: true,
            external_side_effects: false,
            requires_approval: true,
            requires_checkpoint: true,
            requires_review: false,
            mitigation: Some("use a scoped delete".into()),
        };
        store.put(&pattern).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].risk_level, 5);
    }
}
