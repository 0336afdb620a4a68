//! Configuration error types.

/// Errors from loading, merging, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The project config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that could not be read.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config file's contents are not valid TOML.
    #[error("failed to parse {path} as TOML: {source}")]
    Parse {
        /// Path whose contents failed to parse.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The merged configuration could not be serialized back to TOML
    /// (for [`crate::show::ResolvedConfig::render`], or internally
    /// while reflecting [`crate::types::Config::default`] into a
    /// `toml::Value` base layer).
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The final merged `toml::Value` tree didn't deserialize back
    /// into [`crate::types::Config`] (a field's type in the project
    /// file or environment overlay didn't match its section).
    #[error("failed to interpret merged configuration: {0}")]
    Merged(#[from] toml::de::Error),

    /// An `ARCADIA_*` environment variable held a value of the wrong
    /// type for the field it overrides.
    #[error("environment variable {var} has an invalid value for {field}: {reason}")]
    InvalidEnvValue {
        /// The offending variable, e.g. `ARCADIA_BUDGET_SESSION_MAX_USD`.
        var: String,
        /// The dotted field path it was meant to override.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A section failed its own post-merge validation (e.g. a budget
    /// cap of zero, or a floor above a ceiling).
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
