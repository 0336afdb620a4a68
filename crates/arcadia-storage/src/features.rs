//! Feature Registry repository: CRUD plus salience ranking (§4.7).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::Feature;
use arcadia_core::ArtifactId;
use chrono::{DateTime, Utc};

const TABLE: &str = "feature";

/// Exact salience formula from §4.7:
///
/// `s = priority_weight[priority] − 0.10·min(failure_count,3)
///      + 0.05·|blocks| − 0.02·min(days_since(last_worked),5)
///      + 0.20·[index ∈ related_features]`
///
/// clamped to `[0, 1]`.
#[must_use]
pub fn salience(feature: &Feature, related_features: &[i64], now: DateTime<Utc>) -> f64 {
    let priority_term = feature.priority.weight();
    let failure_term = 0.10 * f64::from(feature.failure_count.min(3));
    let blocks_term = 0.05 * feature.blocks.len() as f64;
    let days_since = feature
        .last_worked
        .map(|t| (now - t).num_days().max(0))
        .unwrap_or(5);
    let recency_term = 0.02 * (days_since.min(5) as f64);
    let related_term = if related_features.contains(&feature.index) {
        0.20
    } else {
        0.0
    };

    (priority_term - failure_term + blocks_term - recency_term + related_term).clamp(0.0, 1.0)
}

/// Repository over the `feature` table.
pub struct FeatureStore<'a> {
    db: &'a Database,
}

impl<'a> FeatureStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails or a row already
    /// exists at `feature.index`.
    pub async fn create(&self, feature: &Feature) -> StorageResult<()> {
        let created: Option<Feature> = self
            .db
            .client()
            .create((TABLE, feature.index))
            .content(feature.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))?;
        Ok(())
    }

    /// Fetch one feature by index.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists at `index`.
    pub async fn get(&self, index: i64) -> StorageResult<Feature> {
        let row: Option<Feature> = self.db.client().select((TABLE, index)).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("feature {index}")))
    }

    /// List every feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> StorageResult<Vec<Feature>> {
        let rows: Vec<Feature> = self.db.client().select(TABLE).await?;
        Ok(rows)
    }

    /// Add a `blocked_by` edge from `from` to `to`, enforcing DAG
    /// acyclicity (§9: cyclic graphs are represented as a DAG with
    /// acyclicity enforced at insert).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CyclicDependency`] if the edge would
    /// create a cycle.
    pub async fn add_blocked_by(&self, from: i64, to: i64) -> StorageResult<()> {
        if from == to || self.has_path(to, from).await? {
            return Err(StorageError::CyclicDependency { from, to });
        }

        let mut from_row = self.get(from).await?;
        if !from_row.blocked_by.contains(&to) {
            from_row.blocked_by.push(to);
        }
        let mut to_row = self.get(to).await?;
        if !to_row.blocks.contains(&from) {
            to_row.blocks.push(from);
        }

        let _: Option<Feature> = self
            .db
            .client()
            .update((TABLE, from))
            .content(from_row)
            .await?;
        let _: Option<Feature> = self
            .db
            .client()
            .update((TABLE, to))
            .content(to_row)
            .await?;
        Ok(())
    }

    /// Remove a `blocked_by` edge from `from` to `to`, the inverse of
    /// [`Self::add_blocked_by`]. A human override for a dependency that
    /// no longer applies; it does not touch `passes`.
    ///
    /// # Errors
    ///
    /// Returns an error if either row does not exist.
    pub async fn unblock(&self, from: i64, to: i64) -> StorageResult<()> {
        let mut from_row = self.get(from).await?;
        from_row.blocked_by.retain(|&dep| dep != to);
        let mut to_row = self.get(to).await?;
        to_row.blocks.retain(|&dep| dep != from);

        let _: Option<Feature> = self.db.client().update((TABLE, from)).content(from_row).await?;
        let _: Option<Feature> = self.db.client().update((TABLE, to)).content(to_row).await?;
        Ok(())
    }

    async fn has_path(&self, start: i64, target: i64) -> StorageResult<bool> {
        let mut stack = vec![start];
        let mut visited = std::collections::HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return Ok(true);
            }
            if !visited.insert(current) {
                continue;
            }
            let row = self.get(current).await?;
            stack.extend(row.blocked_by);
        }
        Ok(false)
    }

    /// Mark a feature as passing, enforcing invariant F1 (a `passes`
    /// claim needs at least one artifact or `skip_verification`) and F2
    /// (a feature blocked by an unfinished dependency cannot pass).
    ///
    /// This never touches `failure_count` — only [`Self::record_attempt`]
    /// does (resolved Open Question: a failed `mark_passing` call is not
    /// itself a counted attempt).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingEvidence`] or
    /// [`StorageError::BlockedFeatureCannotPass`] if the invariant does
    /// not hold.
    pub async fn mark_passing(
        &self,
        index: i64,
        artifacts: Vec<ArtifactId>,
        now: DateTime<Utc>,
    ) -> StorageResult<Feature> {
        let mut feature = self.get(index).await?;

        if !feature.blocked_by.is_empty() {
            return Err(StorageError::BlockedFeatureCannotPass { index });
        }
        if artifacts.is_empty() && !feature.skip_verification {
            return Err(StorageError::MissingEvidence { index });
        }

        feature.passes = true;
        feature.verified_at = Some(now);
        feature.verification_artifacts = artifacts;
        feature.last_worked = Some(now);

        let updated: Option<Feature> = self
            .db
            .client()
            .update((TABLE, index))
            .content(feature.clone())
            .await?;
        updated.ok_or_else(|| StorageError::NotFound(format!("feature {index}")))
    }

    /// Record a verified-failing attempt: increments `failure_count` and
    /// stamps `last_worked`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the update fails.
    pub async fn record_attempt(&self, index: i64, now: DateTime<Utc>) -> StorageResult<Feature> {
        let mut feature = self.get(index).await?;
        feature.failure_count = feature.failure_count.saturating_add(1);
        feature.last_worked = Some(now);
        feature.passes = false;

        let updated: Option<Feature> = self
            .db
            .client()
            .update((TABLE, index))
            .content(feature.clone())
            .await?;
        updated.ok_or_else(|| StorageError::NotFound(format!("feature {index}")))
    }

    /// Rank every non-passing, unblocked feature by salience and return
    /// the highest-scoring one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn next_by_salience(
        &self,
        related_features: &[i64],
        now: DateTime<Utc>,
    ) -> StorageResult<Option<Feature>> {
        let candidates: Vec<Feature> = self
            .list()
            .await?
            .into_iter()
            .filter(|f| !f.passes && f.blocked_by.is_empty())
            .collect();

        Ok(candidates
            .into_iter()
            .map(|f| {
                let s = salience(&f, related_features, now);
                (s, f)
            })
            .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, f)| f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn sample_feature(index: i64) -> Feature {
        Feature {
            index,
            category: "auth".into(),
            description: "login form".into(),
            steps: vec!["render form".into()],
            passes: false,
            priority: Priority::P2,
            failure_count: 0,
            last_worked: None,
            blocked_by: vec![],
            blocks: vec![],
            verified_at: None,
            verification_artifacts: vec![],
            blocked_reason: None,
            skip_verification: false,
        }
    }

    #[test]
    fn salience_matches_boundary_example() {
        // priority P2 (0.30), no failures, no blocks, never worked (5
        // days clamp), not in related set: 0.30 - 0 + 0 - 0.10 = 0.20.
        let mut f = sample_feature(1);
        f.priority = Priority::P2;
        let s = salience(&f, &[], Utc::now());
        assert!((s - 0.20).abs() < 1e-9);
    }

    #[test]
    fn salience_clamps_to_unit_interval() {
        let mut f = sample_feature(1);
        f.priority = Priority::P4;
        f.failure_count = 10;
        let s = salience(&f, &[], Utc::now());
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn salience_rewards_related_features() {
        let f = sample_feature(7);
        let without = salience(&f, &[], Utc::now());
        let with = salience(&f, &[7], Utc::now());
        assert!((with - without - 0.20).abs() < 1e-9);
    }

    #[tokio::test]
    async fn mark_passing_requires_evidence() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        store.create(&sample_feature(1)).await.unwrap();

        let err = store
            .mark_passing(1, vec![], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingEvidence { index: 1 }));
    }

    #[tokio::test]
    async fn mark_passing_succeeds_with_artifact() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        store.create(&sample_feature(1)).await.unwrap();

        let updated = store
            .mark_passing(1, vec![ArtifactId::new(1)], Utc::now())
            .await
            .unwrap();
        assert!(updated.passes);
    }

    #[tokio::test]
    async fn mark_passing_rejects_blocked_feature() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let mut blocked = sample_feature(2);
        blocked.blocked_by = vec![1];
        store.create(&blocked).await.unwrap();

        let err = store
            .mark_passing(2, vec![ArtifactId::new(1)], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::BlockedFeatureCannotPass { index: 2 }
        ));
    }

    #[tokio::test]
    async fn add_blocked_by_rejects_cycle() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        store.create(&sample_feature(1)).await.unwrap();
        store.create(&sample_feature(2)).await.unwrap();

        store.add_blocked_by(2, 1).await.unwrap();
        let err = store.add_blocked_by(1, 2).await.unwrap_err();
        assert!(matches!(err, StorageError::CyclicDependency { .. }));
    }

    #[tokio::test]
    async fn unblock_removes_the_edge_in_both_directions() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        store.create(&sample_feature(1)).await.unwrap();
        store.create(&sample_feature(2)).await.unwrap();
        store.add_blocked_by(2, 1).await.unwrap();

        store.unblock(2, 1).await.unwrap();

        assert!(store.get(2).await.unwrap().blocked_by.is_empty());
        assert!(store.get(1).await.unwrap().blocks.is_empty());
    }

    #[tokio::test]
    async fn record_attempt_increments_failure_count() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        store.create(&sample_feature(1)).await.unwrap();

        let updated = store.record_attempt(1, Utc::now()).await.unwrap();
        assert_eq!(updated.failure_count, 1);
        assert!(!updated.passes);
    }
}
