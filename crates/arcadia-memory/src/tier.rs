//! The `{put, get, evict}` surface shared by all three tiers — one
//! composed implementation per tier rather than an inheritance
//! hierarchy (§4.7's implementation note).

use crate::error::MemoryResult;
use arcadia_storage::models::{MemoryRow, MemoryTier as TierKind};
use arcadia_storage::MemoryStore;

/// A single tier's storage surface.
pub trait Tier {
    /// Write a row into this tier.
    async fn put(&self, row: MemoryRow) -> MemoryResult<MemoryRow>;

    /// Fetch a row by id.
    async fn get(&self, id: &str) -> MemoryResult<MemoryRow>;

    /// Remove a row from this tier (it is the caller's job to have
    /// already written it elsewhere, if the eviction is a promotion).
    async fn evict(&self, id: &str) -> MemoryResult<()>;

    /// Every row currently in this tier.
    async fn all(&self) -> MemoryResult<Vec<MemoryRow>>;
}

/// Thin per-tier wrapper around the shared [`MemoryStore`], fixing
/// which [`TierKind`] it operates against.
pub struct TierHandle<'a> {
    store: &'a MemoryStore<'a>,
    kind: TierKind,
}

impl<'a> TierHandle<'a> {
    /// Bind a handle to one tier of the shared store.
    #[must_use]
    pub fn new(store: &'a MemoryStore<'a>, kind: TierKind) -> Self {
        Self { store, kind }
    }
}

impl Tier for TierHandle<'_> {
    async fn put(&self, row: MemoryRow) -> MemoryResult<MemoryRow> {
        debug_assert_eq!(row.tier, self.kind, "row tier must match the handle's tier");
        Ok(self.store.put(&row).await?)
    }

    async fn get(&self, id: &str) -> MemoryResult<MemoryRow> {
        Ok(self.store.get(id).await?)
    }

    async fn evict(&self, id: &str) -> MemoryResult<()> {
        Ok(self.store.evict(id).await?)
    }

    async fn all(&self) -> MemoryResult<Vec<MemoryRow>> {
        Ok(self.store.list_by_tier(self.kind).await?)
    }
}
