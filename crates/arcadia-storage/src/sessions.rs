//! Session repository.

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{Session, SessionStatus};
use arcadia_core::SessionId;
use chrono::{DateTime, Utc};

const TABLE: &str = "session";

/// Repository over the `session` table.
pub struct SessionStore<'a> {
    db: &'a Database,
}

impl<'a> SessionStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Start a new session row in `Running` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn start(&self, id: SessionId, start_time: DateTime<Utc>) -> StorageResult<Session> {
        let session = Session {
            id,
            start_time,
            end_time: None,
            status: SessionStatus::Running,
            summary: None,
        };
        let created: Option<Session> = self
            .db
            .client()
            .create((TABLE, id.get()))
            .content(session.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: SessionId) -> StorageResult<Session> {
        let row: Option<Session> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("session {id}")))
    }

    /// List every session, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> StorageResult<Vec<Session>> {
        let mut rows: Vec<Session> = self.db.client().select(TABLE).await?;
        rows.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(rows)
    }

    /// Transition a session to a terminal status, stamping `end_time`
    /// and `summary`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the update fails.
    pub async fn end(
        &self,
        id: SessionId,
        status: SessionStatus,
        end_time: DateTime<Utc>,
        summary: Option<String>,
    ) -> StorageResult<Session> {
        let mut session = self.get(id).await?;
        session.status = status;
        session.end_time = Some(end_time);
        session.summary = summary;

        let updated: Option<Session> = self
            .db
            .client()
            .update((TABLE, id.get()))
            .content(session.clone())
            .await?;
        updated.ok_or_else(|| StorageError::NotFound(format!("session {id}")))
    }

    /// The most recent session still in `Running` status, if any — used
    /// by crash recovery to detect an unterminated session (§5).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_unterminated(&self) -> StorageResult<Option<Session>> {
        let mut running: Vec<Session> = self
            .list()
            .await?
            .into_iter()
            .filter(|s| s.status == SessionStatus::Running)
            .collect();
        running.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(running.into_iter().next())
    }
}
