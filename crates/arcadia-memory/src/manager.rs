//! The `MemoryManager`: one implementation per tier, plus the
//! promotion/decay transitions between them (§4.7).

use crate::error::MemoryResult;
use crate::index::ColdIndex;
use crate::summary::WarmSummary;
use crate::tier::{Tier, TierHandle};
use arcadia_core::SessionId;
use arcadia_storage::models::{MemoryRow, MemoryTier};
use arcadia_storage::MemoryStore;
use chrono::Utc;
use std::sync::RwLock;
use uuid::Uuid;

/// Default number of Warm summaries retained before the oldest is
/// archived to Cold.
pub const DEFAULT_WARM_RETENTION: usize = 5;

/// Owns the three tiers and performs the promotion/decay transitions
/// between them. Cold's keyword index lives here, not in the store.
pub struct MemoryManager<'a> {
    store: MemoryStore<'a>,
    warm_retention: usize,
    index: RwLock<ColdIndex>,
}

impl<'a> MemoryManager<'a> {
    /// Bind to a session's State Store connection.
    #[must_use]
    pub fn new(store: MemoryStore<'a>) -> Self {
        Self { store, warm_retention: DEFAULT_WARM_RETENTION, index: RwLock::new(ColdIndex::new()) }
    }

    /// Override how many Warm summaries are retained before decay.
    #[must_use]
    pub fn with_warm_retention(mut self, warm_retention: usize) -> Self {
        self.warm_retention = warm_retention;
        self
    }

    fn hot(&self) -> TierHandle<'_> {
        TierHandle::new(&self.store, MemoryTier::Hot)
    }

    fn warm(&self) -> TierHandle<'_> {
        TierHandle::new(&self.store, MemoryTier::Warm)
    }

    fn cold(&self) -> TierHandle<'_> {
        TierHandle::new(&self.store, MemoryTier::Cold)
    }

    /// Rebuild the Cold keyword index from the store. Call once at
    /// startup before serving `search_knowledge`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn rebuild_index(&self) -> MemoryResult<()> {
        let rows = self.cold().all().await?;
        let rebuilt = ColdIndex::rebuild(&rows);
        *self.index.write().expect("cold index lock poisoned") = rebuilt;
        Ok(())
    }

    /// Append a Hot row for the session's current working context.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn record_hot(&self, session_id: SessionId, content: impl Into<String>) -> MemoryResult<MemoryRow> {
        let row = MemoryRow {
            id: Uuid::new_v4().to_string(),
            tier: MemoryTier::Hot,
            session_id,
            created_at: Utc::now(),
            content: content.into(),
            keywords: Vec::new(),
            summarized: false,
        };
        self.hot().put(row).await
    }

    /// The session's current Hot context, for prompt priming.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn hot_context(&self, session_id: SessionId) -> MemoryResult<Vec<MemoryRow>> {
        Ok(self.store.hot_for_session(session_id).await?)
    }

    /// `SESSION_END`: synthesize a Warm summary from Hot, clear Hot, and
    /// decay Warm overflow to Cold if the retention limit is exceeded.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub async fn promote_session_end(
        &self,
        session_id: SessionId,
        summary: WarmSummary,
    ) -> MemoryResult<MemoryRow> {
        let row = MemoryRow {
            id: Uuid::new_v4().to_string(),
            tier: MemoryTier::Warm,
            session_id,
            created_at: Utc::now(),
            content: summary.to_content(),
            keywords: Vec::new(),
            summarized: false,
        };
        let warm_row = self.warm().put(row).await?;

        for hot in self.store.hot_for_session(session_id).await? {
            self.hot().evict(&hot.id).await?;
        }

        self.decay_warm_overflow().await?;
        Ok(warm_row)
    }

    async fn decay_warm_overflow(&self) -> MemoryResult<()> {
        let mut warm_rows = self.warm().all().await?;
        if warm_rows.len() <= self.warm_retention {
            return Ok(());
        }
        warm_rows.sort_by_key(|row| row.created_at);
        let overflow = warm_rows.len() - self.warm_retention;
        for oldest in warm_rows.into_iter().take(overflow) {
            self.archive_to_cold(oldest).await?;
        }
        Ok(())
    }

    /// Fold a Warm summary into Cold, compressing any `issues_found`
    /// that an existing Cold row's `issues_fixed` already covers down
    /// to a one-line reference rather than duplicating the writeup.
    async fn archive_to_cold(&self, row: MemoryRow) -> MemoryResult<()> {
        let mut summary = WarmSummary::from_content(&row.content);

        let cold_rows = self.cold().all().await?;
        let proven: Vec<WarmSummary> =
            cold_rows.iter().map(|r| WarmSummary::from_content(&r.content)).collect();
        summary.issues_found = summary
            .issues_found
            .into_iter()
            .map(|issue| {
                let has_proven_solution = proven
                    .iter()
                    .any(|p| p.issues_fixed.iter().any(|fixed| fixed.eq_ignore_ascii_case(&issue)));
                if has_proven_solution {
                    format!("{issue} (proven solution on file)")
                } else {
                    issue
                }
            })
            .collect();

        let compressed = MemoryRow {
            id: row.id.clone(),
            tier: MemoryTier::Cold,
            session_id: row.session_id,
            created_at: row.created_at,
            keywords: summary.keywords(),
            content: summary.to_content(),
            summarized: true,
        };
        self.warm().evict(&row.id).await?;
        let stored = self.cold().put(compressed).await?;
        self.index.write().expect("cold index lock poisoned").insert(&stored);
        tracing::debug!(row = %stored.id, "archived Warm summary to Cold");
        Ok(())
    }

    /// Keyword search over Cold, using the in-memory index rather than
    /// scanning the store.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching a matched row fails.
    pub async fn search_knowledge(&self, query: &str) -> MemoryResult<Vec<MemoryRow>> {
        let ids = {
            let index = self.index.read().expect("cold index lock poisoned");
            let mut ids: Vec<String> = Vec::new();
            for token in query.split_whitespace() {
                let token = token.trim_matches(|c: char| !c.is_alphanumeric());
                if token.is_empty() {
                    continue;
                }
                for id in index.lookup(token) {
                    if !ids.contains(id) {
                        ids.push(id.clone());
                    }
                }
            }
            ids
        };

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            rows.push(self.store.get(&id).await?);
        }
        Ok(rows)
    }
}
