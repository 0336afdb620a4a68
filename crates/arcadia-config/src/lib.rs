#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for Arcadia Forge.
//!
//! A single [`Config`] type mirrors every tunable named throughout the
//! system — the Security Gate's policy, Autonomy Manager thresholds,
//! session budget cap and token rates, the session watchdog's
//! stall/cyclic-failure windows, Warm Memory's retention depth, the
//! Escalation Rule table, and logging — loaded by merging a compiled-in
//! default, an optional `<project>/.arcadia/config.toml`, and
//! `ARCADIA_*` environment overrides, in that order.
//!
//! # Usage
//!
//! ```rust,no_run
//! use arcadia_config::Config;
//!
//! let resolved = Config::load(Some(std::path::Path::new("."))).unwrap();
//! let config = resolved.config;
//! println!("session budget: ${}", config.budget.session_max_usd);
//! ```

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and layered loading.
pub mod loader;
/// Deep merge of TOML values with per-field layer tracking.
pub mod merge;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::{
    builtin_escalation_rules, Config, EscalationSection, LoggingSection, MemorySection, SessionsSection,
    WatchdogSection,
};

impl Config {
    /// Load configuration with full precedence: defaults → project
    /// file → environment.
    ///
    /// `project_root` is the project directory whose `.arcadia/config.toml`
    /// (if present) forms the project layer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the project config file is malformed,
    /// an `ARCADIA_*` variable holds an invalid value, or the merged
    /// result fails validation.
    pub fn load(project_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(project_root)
    }
}
