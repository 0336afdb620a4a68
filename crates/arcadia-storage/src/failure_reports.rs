//! Failure Report repository (§4.14, promoted to a data-model entity).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{FailureCategory, FailureReport};
use arcadia_core::{FailureReportId, SessionId};

const TABLE: &str = "failure_report";

/// Repository over the `failure_report` table.
pub struct FailureReportStore<'a> {
    db: &'a Database,
}

impl<'a> FailureReportStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new failure report.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn create(&self, report: &FailureReport) -> StorageResult<FailureReport> {
        let created: Option<FailureReport> = self
            .db
            .client()
            .create((TABLE, report.id.get()))
            .content(report.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch a report by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: FailureReportId) -> StorageResult<FailureReport> {
        let row: Option<FailureReport> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("failure report {id}")))
    }

    /// All reports sharing a category, most recent id first — used to
    /// populate `similar_past_failures` when a new report is drafted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_category(
        &self,
        category: FailureCategory,
    ) -> StorageResult<Vec<FailureReport>> {
        let mut rows: Vec<FailureReport> = self.db.client().select(TABLE).await?;
        rows.retain(|r| r.category == category);
        rows.sort_by_key(|r| std::cmp::Reverse(r.id.get()));
        Ok(rows)
    }

    /// All reports for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(
        &self,
        session_id: SessionId,
    ) -> StorageResult<Vec<FailureReport>> {
        let mut rows: Vec<FailureReport> = self.db.client().select(TABLE).await?;
        rows.retain(|r| r.session_id == session_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, category: FailureCategory) -> FailureReport {
        FailureReport {
            id: FailureReportId::new(id),
            session_id: SessionId::new(1),
            category,
            last_successful_action: Some("ran tests".into()),
            failing_action: Some("npm run build".into()),
            error_messages: vec!["module not found".into()],
            likely_cause: Some("missing dependency".into()),
            confidence: 0.7,
            similar_past_failures: vec![],
            suggested_fixes: vec!["run npm install".into()],
        }
    }

    #[tokio::test]
    async fn list_by_category_filters_and_orders_descending() {
        let db = Database::connect_memory().await.unwrap();
        let store = FailureReportStore::new(&db);
        store
            .create(&sample(1, FailureCategory::BlockedCommands))
            .await
            .unwrap();
        store
            .create(&sample(2, FailureCategory::Timeout))
            .await
            .unwrap();
        store
            .create(&sample(3, FailureCategory::BlockedCommands))
            .await
            .unwrap();

        let rows = store
            .list_by_category(FailureCategory::BlockedCommands)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, FailureReportId::new(3));
    }
}
