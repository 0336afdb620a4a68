//! Tiered Memory row repository (§3, §4.8). Tier semantics (promotion,
//! decay, the `{put,get,evict}` trait) live in `arcadia-memory`; this
//! module is the durable row store underneath them.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{MemoryRow, MemoryTier};
use arcadia_core::SessionId;

const TABLE: &str = "memory_row";

/// Repository over the `memory_row` table.
pub struct MemoryStore<'a> {
    db: &'a Database,
}

impl<'a> MemoryStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new memory row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn put(&self, row: &MemoryRow) -> StorageResult<MemoryRow> {
        let created: Option<MemoryRow> = self
            .db
            .client()
            .create((TABLE, row.id.clone()))
            .content(row.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch a row by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: &str) -> StorageResult<MemoryRow> {
        let row: Option<MemoryRow> = self.db.client().select((TABLE, id)).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("memory row {id}")))
    }

    /// Delete a row (invariant M1's tier transitions evict the source
    /// row once the destination tier has it).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn evict(&self, id: &str) -> StorageResult<()> {
        let _: Option<MemoryRow> = self.db.client().delete((TABLE, id)).await?;
        Ok(())
    }

    /// All rows in a tier, across every session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_tier(&self, tier: MemoryTier) -> StorageResult<Vec<MemoryRow>> {
        let mut rows: Vec<MemoryRow> = self.db.client().select(TABLE).await?;
        rows.retain(|r| r.tier == tier);
        Ok(rows)
    }

    /// All `Hot` rows belonging to one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn hot_for_session(&self, session_id: SessionId) -> StorageResult<Vec<MemoryRow>> {
        let mut rows = self.list_by_tier(MemoryTier::Hot).await?;
        rows.retain(|r| r.session_id == session_id);
        Ok(rows)
    }

    /// Keyword search over `Cold` rows — the Cold tier's only retrieval
    /// path (§4.8).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn search_cold(&self, keyword: &str) -> StorageResult<Vec<MemoryRow>> {
        let needle = keyword.to_lowercase();
        let mut rows = self.list_by_tier(MemoryTier::Cold).await?;
        rows.retain(|r| r.keywords.iter().any(|k| k.to_lowercase() == needle));
        Ok(rows)
    }
}
