//! Autonomy Manager persistence (§4.5): per-session level/counters plus
//! the decision log.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{AutonomyDecision, AutonomyLevel, AutonomyMetrics};
use arcadia_core::SessionId;

const METRICS_TABLE: &str = "autonomy_metrics";
const DECISION_TABLE: &str = "autonomy_decision";

/// Repository over the `autonomy_metrics` and `autonomy_decision` tables.
pub struct AutonomyStore<'a> {
    db: &'a Database,
}

impl<'a> AutonomyStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Fetch the session's autonomy metrics, initializing at `Observe`
    /// with zeroed counters if none exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn metrics(&self, session_id: SessionId) -> StorageResult<AutonomyMetrics> {
        let row: Option<AutonomyMetrics> = self
            .db
            .client()
            .select((METRICS_TABLE, session_id.get()))
            .await?;
        Ok(row.unwrap_or(AutonomyMetrics {
            session_id,
            current_level: AutonomyLevel::Observe,
            consecutive_successes: 0,
            consecutive_errors: 0,
        }))
    }

    /// Persist updated autonomy metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn put_metrics(&self, metrics: &AutonomyMetrics) -> StorageResult<AutonomyMetrics> {
        let updated: Option<AutonomyMetrics> = self
            .db
            .client()
            .update((METRICS_TABLE, metrics.session_id.get()))
            .content(metrics.clone())
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => {
                let created: Option<AutonomyMetrics> = self
                    .db
                    .client()
                    .create((METRICS_TABLE, metrics.session_id.get()))
                    .content(metrics.clone())
                    .await?;
                created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
            }
        }
    }

    /// Append a gate decision to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn log_decision(&self, decision: &AutonomyDecision) -> StorageResult<()> {
        let _: Option<AutonomyDecision> = self
            .db
            .client()
            .create((DECISION_TABLE, decision.id.get()))
            .content(decision.clone())
            .await?;
        Ok(())
    }

    /// All gate decisions recorded during a session, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_decisions(
        &self,
        session_id: SessionId,
    ) -> StorageResult<Vec<AutonomyDecision>> {
        let mut rows: Vec<AutonomyDecision> = self.db.client().select(DECISION_TABLE).await?;
        rows.retain(|d| d.session_id == session_id);
        rows.sort_by_key(|d| d.timestamp);
        Ok(rows)
    }
}
