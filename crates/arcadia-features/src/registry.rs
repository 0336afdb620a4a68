//! `FeatureRegistry`: the crate-level API over the State Store's
//! feature catalogue — related-feature context and the full
//! `next_by_salience` selection contract (§4.7).

use crate::error::FeatureResult;
use arcadia_core::ArtifactId;
use arcadia_storage::models::Feature;
use arcadia_storage::FeatureStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Wraps [`FeatureStore`] with the business logic that doesn't belong
/// at the storage layer.
pub struct FeatureRegistry<'a> {
    store: FeatureStore<'a>,
}

impl<'a> FeatureRegistry<'a> {
    /// Bind to a session's State Store connection.
    #[must_use]
    pub fn new(store: FeatureStore<'a>) -> Self {
        Self { store }
    }

    /// Insert a new feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if a row already exists at `feature.index`.
    pub async fn create(&self, feature: &Feature) -> FeatureResult<()> {
        Ok(self.store.create(feature).await?)
    }

    /// Fetch one feature by index.
    ///
    /// # Errors
    ///
    /// Returns an error if no row exists at `index`.
    pub async fn get(&self, index: i64) -> FeatureResult<Feature> {
        Ok(self.store.get(index).await?)
    }

    /// List every feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> FeatureResult<Vec<Feature>> {
        Ok(self.store.list().await?)
    }

    /// Add a `blocked_by` edge, enforcing DAG acyclicity.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge would create a cycle.
    pub async fn add_blocked_by(&self, from: i64, to: i64) -> FeatureResult<()> {
        Ok(self.store.add_blocked_by(from, to).await?)
    }

    /// Remove a `blocked_by` edge, the inverse of [`Self::add_blocked_by`].
    ///
    /// # Errors
    ///
    /// Returns an error if either row does not exist.
    pub async fn unblock(&self, from: i64, to: i64) -> FeatureResult<()> {
        Ok(self.store.unblock(from, to).await?)
    }

    /// Mark a feature as passing (invariants F1/F2 enforced at the
    /// store).
    ///
    /// # Errors
    ///
    /// Returns an error if evidence is missing or the feature is
    /// blocked.
    pub async fn mark_passing(
        &self,
        index: i64,
        artifacts: Vec<ArtifactId>,
        now: DateTime<Utc>,
    ) -> FeatureResult<Feature> {
        Ok(self.store.mark_passing(index, artifacts, now).await?)
    }

    /// Record a verified-failing attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist.
    pub async fn record_attempt(&self, index: i64, now: DateTime<Utc>) -> FeatureResult<Feature> {
        Ok(self.store.record_attempt(index, now).await?)
    }

    /// The related-feature context consumed by the salience formula's
    /// `[index ∈ related_features]` term: every other feature sharing
    /// `focus_index`'s category, plus its direct DAG neighbors — what
    /// a session actively working on `focus_index` is most likely to
    /// also touch next.
    ///
    /// # Errors
    ///
    /// Returns an error if `focus_index` doesn't exist or the query
    /// fails.
    pub async fn related_features(&self, focus_index: i64) -> FeatureResult<Vec<i64>> {
        let focus = self.store.get(focus_index).await?;
        let mut related: Vec<i64> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|f| f.index != focus_index && f.category == focus.category)
            .map(|f| f.index)
            .collect();
        related.extend(focus.blocks.iter().copied());
        related.extend(focus.blocked_by.iter().copied());
        related.sort_unstable();
        related.dedup();
        Ok(related)
    }

    /// The full `next_by_salience` contract: ranks every non-passing
    /// feature by salience, restricted to features whose `blocked_by`
    /// set is either empty or entirely passing unless `skip_blocked` is
    /// set, in which case blocked features are included too so the
    /// caller can surface them. Ties broken by lower index.
    ///
    /// Supersedes [`FeatureStore::next_by_salience`]'s simpler
    /// "`blocked_by` must be empty" filter, which never reconsiders a
    /// feature once its dependencies have since passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn next_by_salience(
        &self,
        related_features: &[i64],
        now: DateTime<Utc>,
        skip_blocked: bool,
    ) -> FeatureResult<Option<Feature>> {
        let all = self.store.list().await?;
        let passes_by_index: HashMap<i64, bool> = all.iter().map(|f| (f.index, f.passes)).collect();

        let mut candidates: Vec<Feature> = all
            .into_iter()
            .filter(|f| !f.passes)
            .filter(|f| skip_blocked || is_unblocked(f, &passes_by_index))
            .collect();
        candidates.sort_by_key(|f| f.index);

        let mut best: Option<(f64, Feature)> = None;
        for feature in candidates {
            let score = arcadia_storage::salience(&feature, related_features, now);
            let replace = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if replace {
                best = Some((score, feature));
            }
        }
        Ok(best.map(|(_, feature)| feature))
    }
}

fn is_unblocked(feature: &Feature, passes_by_index: &HashMap<i64, bool>) -> bool {
    feature
        .blocked_by
        .iter()
        .all(|dep| passes_by_index.get(dep).copied().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_storage::models::Priority;
    use arcadia_storage::Database;

    fn feature(index: i64, category: &str, priority: Priority) -> Feature {
        Feature {
            index,
            category: category.into(),
            description: "desc".into(),
            steps: vec![],
            passes: false,
            priority,
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

    #[tokio::test]
    async fn related_features_includes_same_category_and_dag_neighbors() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(store);

        registry.create(&feature(1, "auth", Priority::P2)).await.unwrap();
        registry.create(&feature(2, "auth", Priority::P2)).await.unwrap();
        registry.create(&feature(3, "billing", Priority::P2)).await.unwrap();
        registry.add_blocked_by(1, 3).await.unwrap();

        let related = registry.related_features(1).await.unwrap();
        assert_eq!(related, vec![2, 3]);
    }

    #[tokio::test]
    async fn next_by_salience_skips_a_feature_blocked_by_unfinished_work() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(store);

        registry.create(&feature(1, "auth", Priority::P1)).await.unwrap();
        registry.create(&feature(2, "auth", Priority::P4)).await.unwrap();
        registry.add_blocked_by(2, 1).await.unwrap();

        let next = registry.next_by_salience(&[], Utc::now(), false).await.unwrap().unwrap();
        assert_eq!(next.index, 1);
    }

    #[tokio::test]
    async fn next_by_salience_reconsiders_once_the_blocker_passes() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(store);

        registry.create(&feature(1, "auth", Priority::P1)).await.unwrap();
        registry.create(&feature(2, "auth", Priority::P4)).await.unwrap();
        registry.add_blocked_by(2, 1).await.unwrap();
        registry.mark_passing(1, vec![ArtifactId::new(1)], Utc::now()).await.unwrap();

        let next = registry.next_by_salience(&[], Utc::now(), false).await.unwrap().unwrap();
        assert_eq!(next.index, 2);
    }

    #[tokio::test]
    async fn skip_blocked_false_by_default_hides_blocked_features_entirely() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(store);

        registry.create(&feature(1, "auth", Priority::P1)).await.unwrap();
        registry.create(&feature(2, "auth", Priority::P1)).await.unwrap();
        registry.add_blocked_by(2, 1).await.unwrap();

        assert!(registry.next_by_salience(&[], Utc::now(), true).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn ties_are_broken_by_lower_index() {
        let db = Database::connect_memory().await.unwrap();
        let store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(store);

        registry.create(&feature(5, "auth", Priority::P2)).await.unwrap();
        registry.create(&feature(2, "auth", Priority::P2)).await.unwrap();

        let next = registry.next_by_salience(&[], Utc::now(), false).await.unwrap().unwrap();
        assert_eq!(next.index, 2);
    }
}
