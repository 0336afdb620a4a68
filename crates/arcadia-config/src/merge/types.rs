use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// The compiled-in [`Default`] impl.
    Default,
    /// `<project>/.arcadia/config.toml`.
    Project,
    /// An `ARCADIA_*` environment variable.
    Environment,
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Project => write!(f, "project (.arcadia/config.toml)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value, keyed by dotted path
/// (e.g. `"budget.session_max_usd"`).
pub type FieldSources = HashMap<String, ConfigLayer>;
