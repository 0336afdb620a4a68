//! Project directory layout for Arcadia Forge (§6).
//!
//! Unlike a global-home-plus-per-project split, Arcadia has exactly one
//! directory that matters: the project being built. [`ProjectHome`]
//! resolves and creates the `.arcadia/` state directory inside it and
//! hands out every path named in §6's persisted layout.
//!
//! # Layout
//!
//! ```text
//! <project>/
//! ├── app_spec.txt                    (the application spec being satisfied)
//! ├── screenshots/                    (evidence artifacts)
//! └── .arcadia/
//!     ├── project.db/                 (SurrealKV — State Store)
//!     ├── .events.jsonl                (checksummed append-only Event Log)
//!     ├── verification/                (feature_<index>_<slug>.<ext> artifacts)
//!     ├── .paused_session.json         (present only while paused)
//!     ├── config.toml                  (optional project-level overrides)
//!     └── supervisor.lock              (advisory, held for the supervisor's lifetime)
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Resolves every on-disk path the supervisor reads or writes for one
/// project (§6).
#[derive(Debug, Clone)]
pub struct ProjectHome {
    project_root: PathBuf,
}

impl ProjectHome {
    /// Use `project_root` directly as the project directory.
    #[must_use]
    pub fn from_path(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Resolve the project directory from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn resolve_cwd() -> io::Result<Self> {
        Ok(Self::from_path(std::env::current_dir()?))
    }

    /// Create `.arcadia/`, `.arcadia/verification/`, and `screenshots/` if
    /// they do not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.dot_arcadia())?;
        std::fs::create_dir_all(self.verification_dir())?;
        std::fs::create_dir_all(self.screenshots_dir())?;
        Ok(())
    }

    /// The project root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.project_root
    }

    /// The `.arcadia/` state directory.
    #[must_use]
    pub fn dot_arcadia(&self) -> PathBuf {
        self.project_root.join(".arcadia")
    }

    /// Path to the State Store's `SurrealKV` database directory.
    #[must_use]
    pub fn project_db_path(&self) -> PathBuf {
        self.dot_arcadia().join("project.db")
    }

    /// Path to the checksummed append-only Event Log.
    #[must_use]
    pub fn events_log_path(&self) -> PathBuf {
        self.dot_arcadia().join(".events.jsonl")
    }

    /// Directory holding verification artifacts
    /// (`feature_<index>_<slug>.<ext>`).
    #[must_use]
    pub fn verification_dir(&self) -> PathBuf {
        self.dot_arcadia().join("verification")
    }

    /// Directory holding screenshot evidence.
    #[must_use]
    pub fn screenshots_dir(&self) -> PathBuf {
        self.project_root.join("screenshots")
    }

    /// Path to the paused-session marker file. Present only while a
    /// session is paused awaiting resume.
    #[must_use]
    pub fn paused_session_path(&self) -> PathBuf {
        self.dot_arcadia().join(".paused_session.json")
    }

    /// Path to the optional project-level configuration overrides file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dot_arcadia().join("config.toml")
    }

    /// Path to the advisory single-supervisor lock file.
    #[must_use]
    pub fn supervisor_lock_path(&self) -> PathBuf {
        self.dot_arcadia().join("supervisor.lock")
    }

    /// Path to the application spec this project is being driven to
    /// satisfy.
    #[must_use]
    pub fn app_spec_path(&self) -> PathBuf {
        self.project_root.join("app_spec.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_state_directories() {
        let dir = tempfile::tempdir().unwrap();
        let home = ProjectHome::from_path(dir.path());
        home.ensure().unwrap();

        assert!(home.dot_arcadia().is_dir());
        assert!(home.verification_dir().is_dir());
        assert!(home.screenshots_dir().is_dir());
    }

    #[test]
    fn path_accessors_nest_under_dot_arcadia() {
        let home = ProjectHome::from_path("/work/myapp");
        assert_eq!(
            home.project_db_path(),
            PathBuf::from("/work/myapp/.arcadia/project.db")
        );
        assert_eq!(
            home.events_log_path(),
            PathBuf::from("/work/myapp/.arcadia/.events.jsonl")
        );
        assert_eq!(
            home.paused_session_path(),
            PathBuf::from("/work/myapp/.arcadia/.paused_session.json")
        );
        assert_eq!(
            home.supervisor_lock_path(),
            PathBuf::from("/work/myapp/.arcadia/supervisor.lock")
        );
        assert_eq!(
            home.app_spec_path(),
            PathBuf::from("/work/myapp/app_spec.txt")
        );
    }

    #[test]
    fn screenshots_dir_is_outside_dot_arcadia() {
        let home = ProjectHome::from_path("/work/myapp");
        assert_eq!(
            home.screenshots_dir(),
            PathBuf::from("/work/myapp/screenshots")
        );
    }
}
