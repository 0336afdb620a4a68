//! Artifact repository.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::Artifact;
use arcadia_core::{ArtifactId, SessionId};

const TABLE: &str = "artifact";

/// Repository over the `artifact` table.
pub struct ArtifactStore<'a> {
    db: &'a Database,
}

impl<'a> ArtifactStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a new artifact row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn create(&self, artifact: &Artifact) -> StorageResult<Artifact> {
        let created: Option<Artifact> = self
            .db
            .client()
            .create((TABLE, artifact.id.get()))
            .content(artifact.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch an artifact by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: ArtifactId) -> StorageResult<Artifact> {
        let row: Option<Artifact> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("artifact {id}")))
    }

    /// All artifacts recorded during a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(&self, session_id: SessionId) -> StorageResult<Vec<Artifact>> {
        let mut rows: Vec<Artifact> = self.db.client().select(TABLE).await?;
        rows.retain(|a| a.session_id == session_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtifactType;
    use serde_json::json;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let db = Database::connect_memory().await.unwrap();
        let store = ArtifactStore::new(&db);
        let artifact = Artifact {
            id: ArtifactId::new(1),
            session_id: SessionId::new(1),
            artifact_type: ArtifactType::Screenshot,
            path_relative: "screenshots/home.png".into(),
            sha256_checksum: "deadbeef".into(),
            metadata: json!({"width": 1280}),
        };
        store.create(&artifact).await.unwrap();

        let fetched = store.get(ArtifactId::new(1)).await.unwrap();
        assert_eq!(fetched.path_relative, "screenshots/home.png");
    }
}
