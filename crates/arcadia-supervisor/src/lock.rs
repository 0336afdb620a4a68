//! The advisory `.arcadia/supervisor.lock` file enforcing one
//! supervisor per project (§4.11, §5: "no two sessions ever run
//! concurrently against one project").
//!
//! Not grounded on a teacher file — the teacher runs one daemon process
//! serving many concurrent sessions rather than one supervisor per
//! project directory, so it has no equivalent single-instance lock.
//! The implementation is the standard pidfile idiom: write our pid,
//! refuse to start if an existing lock names a pid still alive, remove
//! the file on clean drop.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{SupervisorError, SupervisorResult};

/// Holds `.arcadia/supervisor.lock` for the lifetime of this process.
/// Removed on drop so a clean exit always releases it; a crash leaves
/// it behind for the next start's staleness check to reclaim.
pub struct SupervisorLock {
    path: PathBuf,
}

impl SupervisorLock {
    /// Acquire the lock at `path`, writing this process's pid.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::AlreadyRunning`] if the lock names a
    /// pid that is still alive, or an I/O error if the file can't be
    /// read or written.
    pub fn acquire(path: impl Into<PathBuf>) -> SupervisorResult<Self> {
        let path = path.into();
        if let Some(held_by) = Self::read_live_holder(&path)? {
            return Err(SupervisorError::AlreadyRunning { held_by });
        }
        fs::write(&path, std::process::id().to_string())?;
        Ok(Self { path })
    }

    fn read_live_holder(path: &Path) -> SupervisorResult<Option<u32>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Ok(pid) = contents.trim().parse::<u32>() else {
            return Ok(None);
        };
        if pid == std::process::id() || !process_alive(pid) {
            return Ok(None);
        }
        Ok(Some(pid))
    }
}

impl Drop for SupervisorLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "failed to remove supervisor lock: {e}");
            }
        }
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    // No portable liveness check off Unix; treat any recorded pid as
    // live and let the operator clear a stale lock manually.
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_then_drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supervisor.lock");
        {
            let _lock = SupervisorLock::acquire(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn stale_lock_naming_a_dead_pid_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supervisor.lock");
        // pid 1 is almost certainly not this test process and, if the
        // sandbox has no /proc, process_alive degrades to "assume
        // live" on non-unix only — this test targets unix CI.
        std::fs::write(&path, "999999999").unwrap();
        let lock = SupervisorLock::acquire(&path);
        assert!(lock.is_ok());
    }

    #[test]
    fn lock_held_by_a_live_pid_refuses_to_acquire() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supervisor.lock");
        std::fs::write(&path, std::process::id().to_string()).unwrap();
        // Our own pid is always treated as not-a-conflict (reentrant
        // acquire from the same process), so name a different live
        // pid: pid 1 exists on any unix system.
        std::fs::write(&path, "1").unwrap();
        let result = SupervisorLock::acquire(&path);
        assert!(matches!(result, Err(SupervisorError::AlreadyRunning { held_by: 1 })));
    }
}
