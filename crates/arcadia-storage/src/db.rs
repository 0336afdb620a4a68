//! `SurrealDB` connection wrapper.
//!
//! The State Store is one embedded `SurrealDB` instance per project,
//! using `SurrealKV` as its storage engine.
//!
//! | Mode | Connection | Backend |
//! |------|-----------|---------|
//! | Project (persisted) | `surrealkv://.arcadia/project.db` | `SurrealKV` |
//! | Tests | `mem://` | In-memory |

use crate::error::{StorageError, StorageResult};

/// Re-export `SurrealDB` for direct query access when a repository needs
/// a raw `SurrealQL` statement.
pub use surrealdb;

/// Embedded `SurrealDB` connection for one project's State Store.
///
/// Cheaply [`Clone`] — `surrealdb::Surreal` is a handle onto a shared
/// connection, not the connection itself, so callers that need the
/// same store from more than one owner (e.g. both the Session
/// Supervisor and the Human Channel's approval gateway) clone it
/// rather than reconnecting.
#[derive(Clone)]
pub struct Database {
    inner: surrealdb::Surreal<surrealdb::engine::any::Any>,
}

impl Database {
    /// Connect to the project's persisted `SurrealKV`-backed database at
    /// `path` (typically `.arcadia/project.db`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the connection fails.
    pub async fn connect_embedded(path: &str) -> StorageResult<Self> {
        let endpoint = format!("surrealkv://{path}");
        let db: surrealdb::Surreal<surrealdb::engine::any::Any> = surrealdb::Surreal::init();
        db.connect(&endpoint)
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        db.use_ns("arcadia")
            .use_db("project")
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        Ok(Self { inner: db })
    }

    /// Connect to an in-memory database (tests).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the connection fails.
    pub async fn connect_memory() -> StorageResult<Self> {
        let db: surrealdb::Surreal<surrealdb::engine::any::Any> = surrealdb::Surreal::init();
        db.connect("mem://")
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        db.use_ns("arcadia")
            .use_db("test")
            .await
            .map_err(|e: surrealdb::Error| StorageError::Connection(e.to_string()))?;
        Ok(Self { inner: db })
    }

    /// The underlying client, for repository modules that need raw
    /// `SurrealQL`.
    #[must_use]
    pub fn client(&self) -> &surrealdb::Surreal<surrealdb::engine::any::Any> {
        &self.inner
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_memory_selects_namespace() {
        let db = Database::connect_memory().await.unwrap();
        let mut resp = db.client().query("RETURN 1").await.unwrap();
        let value: Option<i64> = resp.take(0).unwrap();
        assert_eq!(value, Some(1));
    }
}
