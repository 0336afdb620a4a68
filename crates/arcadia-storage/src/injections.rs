//! Injection Point repository (§4.10).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::{InjectionPoint, InjectionStatus};
use arcadia_core::{InjectionPointId, SessionId};

const TABLE: &str = "injection_point";

/// Repository over the `injection_point` table.
pub struct InjectionStore<'a> {
    db: &'a Database,
}

impl<'a> InjectionStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Open a new Injection Point in `Pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn open(&self, point: &InjectionPoint) -> StorageResult<InjectionPoint> {
        let created: Option<InjectionPoint> = self
            .db
            .client()
            .create((TABLE, point.id.get()))
            .content(point.clone())
            .await?;
        created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
    }

    /// Fetch an Injection Point by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists.
    pub async fn get(&self, id: InjectionPointId) -> StorageResult<InjectionPoint> {
        let row: Option<InjectionPoint> = self.db.client().select((TABLE, id.get())).await?;
        row.ok_or_else(|| StorageError::NotFound(format!("injection point {id}")))
    }

    /// Every Injection Point still `Pending`, across sessions (the poller
    /// scans this set, §5).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_pending(&self) -> StorageResult<Vec<InjectionPoint>> {
        let mut rows: Vec<InjectionPoint> = self.db.client().select(TABLE).await?;
        rows.retain(|p| p.status == InjectionStatus::Pending);
        Ok(rows)
    }

    /// Resolve an Injection Point with a human (or auto-applied)
    /// response.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist, is not `Pending`, or
    /// the update fails.
    pub async fn resolve(
        &self,
        id: InjectionPointId,
        status: InjectionStatus,
        response: String,
        responded_by: String,
    ) -> StorageResult<InjectionPoint> {
        let mut point = self.get(id).await?;
        if point.status != InjectionStatus::Pending {
            return Err(StorageError::Internal(format!(
                "injection point {id} is not pending"
            )));
        }
        point.status = status;
        point.response = Some(response);
        point.responded_by = Some(responded_by);

        let updated: Option<InjectionPoint> = self
            .db
            .client()
            .update((TABLE, id.get()))
            .content(point.clone())
            .await?;
        updated.ok_or_else(|| StorageError::NotFound(format!("injection point {id}")))
    }

    /// All Injection Points opened during a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_session(
        &self,
        session_id: SessionId,
    ) -> StorageResult<Vec<InjectionPoint>> {
        let mut rows: Vec<InjectionPoint> = self.db.client().select(TABLE).await?;
        rows.retain(|p| p.session_id == session_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InjectionType;
    use chrono::Utc;

    fn sample(id: i64, session_id: i64) -> InjectionPoint {
        InjectionPoint {
            id: InjectionPointId::new(id),
            session_id: SessionId::new(session_id),
            injection_type: InjectionType::Approval,
            created_at: Utc::now(),
            context: "about to force-push".into(),
            options: vec!["allow".into(), "deny".into()],
            recommendation: Some("deny".into()),
            timeout_s: 300,
            default_on_timeout: Some("deny".into()),
            status: InjectionStatus::Pending,
            response: None,
            responded_by: None,
        }
    }

    #[tokio::test]
    async fn list_pending_excludes_resolved() {
        let db = Database::connect_memory().await.unwrap();
        let store = InjectionStore::new(&db);
        store.open(&sample(1, 1)).await.unwrap();
        store.open(&sample(2, 1)).await.unwrap();

        store
            .resolve(
                InjectionPointId::new(1),
                InjectionStatus::Responded,
                "deny".into(),
                "alice".into(),
            )
            .await
            .unwrap();

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, InjectionPointId::new(2));
    }

    #[tokio::test]
    async fn resolve_rejects_already_resolved_point() {
        let db = Database::connect_memory().await.unwrap();
        let store = InjectionStore::new(&db);
        store.open(&sample(1, 1)).await.unwrap();
        store
            .resolve(
                InjectionPointId::new(1),
                InjectionStatus::Responded,
                "deny".into(),
                "alice".into(),
            )
            .await
            .unwrap();

        let err = store
            .resolve(
                InjectionPointId::new(1),
                InjectionStatus::Responded,
                "allow".into(),
                "bob".into(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
    }
}
