//! The Checkpoint Manager: VCS commit at a semantic trigger, feature
//! status + Hot-memory snapshot, rollback (§4.6).

use crate::error::CheckpointResult;
use crate::git;
use arcadia_core::{CheckpointId, SessionId};
use arcadia_storage::models::{Checkpoint, CheckpointTrigger};
use arcadia_storage::CheckpointStore;
use std::path::{Path, PathBuf};

/// Marks a checkpoint row as belonging to a particular `(trigger,
/// sequence)` pair so a repeated call for the same sequence number is
/// recognized as a duplicate before any `git` command runs, rather than
/// relying on two distinct `--allow-empty` commits happening to collide
/// on hash (they never will, since each carries its own timestamp).
fn sequence_marker(sequence: u32) -> String {
    format!("seq={sequence}")
}

/// Deterministic row id: `CheckpointId` is a global key, but nothing
/// upstream of this crate yet allocates one centrally, so a checkpoint's
/// id is derived from the session it belongs to and its sequence number
/// within that session. Collisions would require two sessions to share
/// an id space, which `SessionId` already rules out per row.
fn checkpoint_id(session_id: SessionId, sequence: u32) -> CheckpointId {
    CheckpointId::new(session_id.get().saturating_mul(1_000_000) + i64::from(sequence))
}

/// Takes checkpoints against the project's own working tree and wraps
/// the [`CheckpointStore`] for idempotent persistence and rollback.
pub struct CheckpointManager<'a> {
    repo_path: PathBuf,
    store: CheckpointStore<'a>,
}

impl<'a> CheckpointManager<'a> {
    /// Bind to a project's working tree and its checkpoint repository.
    pub fn new(repo_path: impl Into<PathBuf>, store: CheckpointStore<'a>) -> Self {
        Self { repo_path: repo_path.into(), store }
    }

    /// The working tree this manager commits against.
    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Take a checkpoint at `trigger`, sequence-numbered within that
    /// trigger for this session. Idempotent: a second call with the
    /// same `(session_id, trigger, sequence)` returns the previously
    /// recorded row without running `git` again (invariant C1).
    ///
    /// `hot_memory_snapshot` is only persisted for `ErrorRecovery`
    /// checkpoints — every other trigger drops it, since the supervisor
    /// isn't unwinding and Hot memory remains live in the session.
    ///
    /// # Errors
    ///
    /// Returns an error if `git` fails or the store rejects the write.
    #[allow(clippy::too_many_arguments)]
    pub async fn checkpoint(
        &self,
        session_id: SessionId,
        trigger: CheckpointTrigger,
        sequence: u32,
        feature_status_snapshot: serde_json::Value,
        pending_work: Option<String>,
        hot_memory_snapshot: Option<serde_json::Value>,
    ) -> CheckpointResult<Checkpoint> {
        let marker = sequence_marker(sequence);
        if let Some(existing) = self
            .store
            .list_by_session(session_id)
            .await?
            .into_iter()
            .find(|c| c.trigger == trigger && c.notes.as_deref() == Some(marker.as_str()))
        {
            tracing::debug!(session = %session_id, ?trigger, sequence, "checkpoint already recorded, skipping commit");
            return Ok(existing);
        }

        git::add_all(&self.repo_path)?;
        let message = format!("{trigger:?} session={session_id} seq={sequence}");
        let commit_hash = git::commit_allow_empty(&self.repo_path, &message)?;

        let hot_memory_snapshot = match trigger {
            CheckpointTrigger::ErrorRecovery => hot_memory_snapshot,
            _ => None,
        };

        let checkpoint = Checkpoint {
            id: checkpoint_id(session_id, sequence),
            session_id,
            timestamp: chrono::Utc::now(),
            trigger,
            vcs_commit_hash: commit_hash,
            feature_status_snapshot,
            pending_work,
            notes: Some(marker),
            hot_memory_snapshot,
        };
        let created = self.store.create(&checkpoint).await?;
        tracing::info!(session = %session_id, ?trigger, commit = %created.vcs_commit_hash, "checkpoint taken");
        Ok(created)
    }

    /// Restore the working tree to `checkpoint_id`'s commit and return
    /// its stored feature-status snapshot for the caller to write back
    /// into the State Store. A rollback never deletes history — the
    /// caller is expected to append its own CHECKPOINT event.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint doesn't exist or `git` fails.
    pub async fn rollback_to(&self, checkpoint_id: CheckpointId) -> CheckpointResult<Checkpoint> {
        let target = self.store.get(checkpoint_id).await?;
        git::reset_hard(&self.repo_path, &target.vcs_commit_hash)?;
        tracing::info!(
            checkpoint = %checkpoint_id,
            commit = %target.vcs_commit_hash,
            "rolled back working tree"
        );
        Ok(target)
    }

    /// The most recent checkpoint for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn latest(&self, session_id: SessionId) -> CheckpointResult<Option<Checkpoint>> {
        Ok(self.store.latest(session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_storage::Database;
    use serde_json::json;
    use std::process::Command;
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let run = |args: &[&str]| {
            Command::new("git").current_dir(dir.path()).args(args).output().unwrap()
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "test"]);
        std::fs::write(dir.path().join("README.md"), "seed").unwrap();
        run(&["add", "-A"]);
        run(&["commit", "-q", "-m", "seed"]);
        dir
    }

    #[tokio::test]
    async fn checkpoint_records_a_commit_hash() {
        let repo = init_repo();
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        let manager = CheckpointManager::new(repo.path(), store);

        let checkpoint = manager
            .checkpoint(
                SessionId::new(1),
                CheckpointTrigger::SessionStart,
                1,
                json!({}),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(checkpoint.vcs_commit_hash.len(), 40);
    }

    #[tokio::test]
    async fn repeated_sequence_is_idempotent() {
        let repo = init_repo();
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        let manager = CheckpointManager::new(repo.path(), store);

        let first = manager
            .checkpoint(SessionId::new(1), CheckpointTrigger::FeatureComplete, 3, json!({}), None, None)
            .await
            .unwrap();
        let second = manager
            .checkpoint(SessionId::new(1), CheckpointTrigger::FeatureComplete, 3, json!({"changed": true}), None, None)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.vcs_commit_hash, second.vcs_commit_hash);
    }

    #[tokio::test]
    async fn only_error_recovery_persists_hot_memory() {
        let repo = init_repo();
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        let manager = CheckpointManager::new(repo.path(), store);

        let hot = json!({"active_feature": 4});
        let recovery = manager
            .checkpoint(
                SessionId::new(2),
                CheckpointTrigger::ErrorRecovery,
                1,
                json!({}),
                None,
                Some(hot.clone()),
            )
            .await
            .unwrap();
        assert_eq!(recovery.hot_memory_snapshot, Some(hot.clone()));

        let routine = manager
            .checkpoint(
                SessionId::new(2),
                CheckpointTrigger::SessionEnd,
                1,
                json!({}),
                None,
                Some(hot),
            )
            .await
            .unwrap();
        assert_eq!(routine.hot_memory_snapshot, None);
    }

    #[tokio::test]
    async fn rollback_restores_the_commit_and_returns_its_snapshot() {
        let repo = init_repo();
        let db = Database::connect_memory().await.unwrap();
        let store = CheckpointStore::new(&db);
        let manager = CheckpointManager::new(repo.path(), store);

        let checkpoint = manager
            .checkpoint(
                SessionId::new(1),
                CheckpointTrigger::FeatureComplete,
                1,
                json!({"1": true}),
                Some("finish docs".into()),
                None,
            )
            .await
            .unwrap();

        std::fs::write(repo.path().join("scratch.txt"), "uncommitted").unwrap();

        let restored = manager.rollback_to(checkpoint.id).await.unwrap();
        assert_eq!(restored.feature_status_snapshot, json!({"1": true}));
        assert!(!repo.path().join("scratch.txt").exists());
    }
}
