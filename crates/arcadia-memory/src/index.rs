//! A simple in-memory inverted index over Cold rows' keywords, rebuilt
//! from the store on startup and updated incrementally thereafter —
//! adequate for the compact record volumes this component targets,
//! avoiding a full-text-search dependency (§4.7's implementation note).

use arcadia_storage::models::MemoryRow;
use std::collections::HashMap;

/// Keyword → Cold row ids.
#[derive(Debug, Default)]
pub struct ColdIndex {
    by_keyword: HashMap<String, Vec<String>>,
}

impl ColdIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from scratch over every Cold row.
    #[must_use]
    pub fn rebuild(rows: &[MemoryRow]) -> Self {
        let mut index = Self::new();
        for row in rows {
            index.insert(row);
        }
        index
    }

    /// Index one additional row's keywords.
    pub fn insert(&mut self, row: &MemoryRow) {
        for keyword in &row.keywords {
            let ids = self.by_keyword.entry(keyword.to_lowercase()).or_default();
            if !ids.contains(&row.id) {
                ids.push(row.id.clone());
            }
        }
    }

    /// Row ids carrying `keyword`, if any.
    #[must_use]
    pub fn lookup(&self, keyword: &str) -> &[String] {
        self.by_keyword.get(&keyword.to_lowercase()).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::SessionId;
    use chrono::Utc;
    use arcadia_storage::models::MemoryTier;

    fn cold_row(id: &str, keywords: &[&str]) -> MemoryRow {
        MemoryRow {
            id: id.to_string(),
            tier: MemoryTier::Cold,
            session_id: SessionId::new(1),
            created_at: Utc::now(),
            content: String::new(),
            keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
            summarized: true,
        }
    }

    #[test]
    fn rebuild_indexes_every_row_keyword() {
        let rows = vec![cold_row("a", &["Lockfile", "ci"]), cold_row("b", &["flaky"])];
        let index = ColdIndex::rebuild(&rows);
        assert_eq!(index.lookup("lockfile"), ["a"]);
        assert_eq!(index.lookup("flaky"), ["b"]);
        assert!(index.lookup("missing").is_empty());
    }

    #[test]
    fn insert_is_idempotent_for_the_same_row() {
        let mut index = ColdIndex::new();
        let row = cold_row("a", &["ci"]);
        index.insert(&row);
        index.insert(&row);
        assert_eq!(index.lookup("ci"), ["a"]);
    }
}
