//! A temporary project directory, set up the way a fresh Arcadia
//! project would look before its first session runs.

use arcadia_core::dirs::ProjectHome;
use tempfile::TempDir;

/// A [`ProjectHome`] rooted in a [`TempDir`], kept alive alongside it
/// so the directory isn't cleaned up while still in use.
pub struct TempProject {
    /// Backing temp directory. Held only to keep it from being dropped
    /// (and deleted) before `home` is done with it.
    pub dir: TempDir,
    /// The project's resolved paths.
    pub home: ProjectHome,
}

/// Build a fresh, empty project directory with `.arcadia/` and its
/// subdirectories already created.
///
/// # Panics
///
/// Panics if a temp directory cannot be created or its state
/// subdirectories cannot be initialized — both indicate a broken test
/// environment, not a condition tests should handle.
#[must_use]
pub fn temp_project() -> TempProject {
    let dir = tempfile::tempdir().expect("failed to create temp directory");
    let home = ProjectHome::from_path(dir.path());
    home.ensure().expect("failed to initialize project state directories");
    TempProject { dir, home }
}
