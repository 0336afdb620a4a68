//! Workspace-wide error taxonomy for Arcadia Forge.
//!
//! Every crate defines its own `thiserror` enum scoped to its own
//! contract (`StorageError`, `SecurityError`, `SupervisorError`, ...).
//! [`ArcadiaError`] is the narrow umbrella used at seams that must name
//! errors from more than one crate (the Hook Pipeline, the Session
//! Supervisor) without widening all the way to `anyhow`.

use thiserror::Error;

/// Errors raised by the core ids/runtime seam itself.
#[derive(Debug, Error)]
pub enum ArcadiaError {
    /// A feature row was missing the evidence required by invariant F1.
    #[error("feature {index} has no verification artifacts and skip_verification was not set")]
    MissingEvidence {
        /// The feature index.
        index: i64,
    },

    /// A caller tried to mutate an immutable field of a Feature row.
    #[error("feature {index} field `{field}` is immutable outside initialization")]
    ImmutableField {
        /// The feature index.
        index: i64,
        /// The field name the caller attempted to mutate.
        field: &'static str,
    },

    /// A dependency edge would have created a cycle in the feature DAG.
    #[error("adding blocked_by edge {from} -> {to} would create a cycle")]
    CyclicDependency {
        /// The feature that would gain the edge.
        from: i64,
        /// The feature it would depend on.
        to: i64,
    },

    /// The agent runtime returned malformed output.
    #[error("agent runtime protocol violation: {0}")]
    RuntimeProtocol(String),

    /// A lower-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lower-level (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias for fallible core operations.
pub type ArcadiaResult<T> = Result<T, ArcadiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_evidence_formats_with_index() {
        let err = ArcadiaError::MissingEvidence { index: 5 };
        assert_eq!(
            err.to_string(),
            "feature 5 has no verification artifacts and skip_verification was not set"
        );
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::other("disk full");
        let err: ArcadiaError = io_err.into();
        assert!(matches!(err, ArcadiaError::Io(_)));
    }
}
