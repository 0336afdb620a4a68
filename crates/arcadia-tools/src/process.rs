//! Background process tracking for the server-lifecycle tool family
//! (start/stop/wait/status), generalizing [`crate::shell`]'s
//! `tokio::process::Command` usage to long-running children instead of
//! one-shot commands.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// A server process's last known state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Still running.
    Running,
    /// Exited, with its exit code if the OS reported one.
    Exited(Option<i32>),
    /// No process registered under that name.
    Unknown,
}

/// Tracks named background processes (dev servers, build watchers) a
/// session starts and must be able to stop or poll later.
#[derive(Clone, Default)]
pub struct ProcessTracker {
    children: Arc<Mutex<HashMap<String, Child>>>,
}

impl ProcessTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `command` in `cwd`, registering it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process fails to spawn, or if `name` is
    /// already registered.
    pub async fn start(
        &self,
        name: &str,
        command: &str,
        cwd: &std::path::Path,
    ) -> std::io::Result<()> {
        let mut children = self.children.lock().await;
        if children.contains_key(name) {
            return Err(std::io::Error::other(format!(
                "a process named '{name}' is already running"
            )));
        }
        let child = Command::new("bash").arg("-c").arg(command).current_dir(cwd).spawn()?;
        children.insert(name.to_string(), child);
        Ok(())
    }

    /// Send a kill signal to the process registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no process is registered under `name`, or
    /// the kill call fails.
    pub async fn stop(&self, name: &str) -> std::io::Result<()> {
        let mut children = self.children.lock().await;
        let child = children
            .get_mut(name)
            .ok_or_else(|| std::io::Error::other(format!("no process named '{name}'")))?;
        child.kill().await?;
        children.remove(name);
        Ok(())
    }

    /// Block until the process registered under `name` exits.
    ///
    /// # Errors
    ///
    /// Returns an error if no process is registered under `name`, or
    /// waiting on it fails.
    pub async fn wait(&self, name: &str) -> std::io::Result<Option<i32>> {
        let mut children = self.children.lock().await;
        let child = children
            .get_mut(name)
            .ok_or_else(|| std::io::Error::other(format!("no process named '{name}'")))?;
        let status = child.wait().await?;
        children.remove(name);
        Ok(status.code())
    }

    /// Poll whether the process registered under `name` is still
    /// running, without blocking.
    pub async fn status(&self, name: &str) -> ProcessStatus {
        let mut children = self.children.lock().await;
        let Some(child) = children.get_mut(name) else {
            return ProcessStatus::Unknown;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                let code = status.code();
                children.remove(name);
                ProcessStatus::Exited(code)
            },
            Ok(None) => ProcessStatus::Running,
            Err(_) => ProcessStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_and_reports_running() {
        let tracker = ProcessTracker::new();
        tracker.start("sleeper", "sleep 5", &std::env::temp_dir()).await.unwrap();
        assert_eq!(tracker.status("sleeper").await, ProcessStatus::Running);
        tracker.stop("sleeper").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_duplicate_names() {
        let tracker = ProcessTracker::new();
        tracker.start("one", "sleep 5", &std::env::temp_dir()).await.unwrap();
        let err = tracker.start("one", "sleep 5", &std::env::temp_dir()).await;
        assert!(err.is_err());
        tracker.stop("one").await.unwrap();
    }

    #[tokio::test]
    async fn wait_reports_exit_code() {
        let tracker = ProcessTracker::new();
        tracker.start("quick", "exit 7", &std::env::temp_dir()).await.unwrap();
        let code = tracker.wait("quick").await.unwrap();
        assert_eq!(code, Some(7));
    }

    #[tokio::test]
    async fn status_unknown_for_unregistered_name() {
        let tracker = ProcessTracker::new();
        assert_eq!(tracker.status("ghost").await, ProcessStatus::Unknown);
    }
}
