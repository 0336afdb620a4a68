//! `tracing-subscriber` setup: one entry point that builds a global
//! subscriber from a [`LogConfig`], with a pluggable output format
//! (compact for a terminal, JSON for a supervisor running unattended)
//! and per-crate directive overrides layered on top of a base level.

use crate::error::{TelemetryError, TelemetryResult};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, colored, single-line-ish output for a terminal.
    #[default]
    Compact,
    /// Multi-line output with source location, for local debugging.
    Pretty,
    /// One JSON object per line, for a supervisor running unattended
    /// under a log collector.
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Standard error (the default).
    Stderr,
    /// A rolling file under the given directory.
    File {
        /// Directory the rolling appender writes into.
        directory: PathBuf,
        /// File name prefix.
        prefix: String,
    },
}

impl Default for LogTarget {
    fn default() -> Self {
        Self::Stderr
    }
}

/// Configuration for [`setup_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    base_level: String,
    format: LogFormat,
    target: LogTarget,
    directives: Vec<String>,
}

impl LogConfig {
    /// Start from a base level (`"trace"`, `"debug"`, `"info"`, ...),
    /// applied workspace-wide unless a more specific directive
    /// overrides it.
    #[must_use]
    pub fn new(base_level: impl Into<String>) -> Self {
        Self {
            base_level: base_level.into(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            directives: Vec::new(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to a rolling file instead of stderr.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Add a per-crate directive, e.g. `"arcadia_hooks=trace"`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.base_level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;
        for directive in &self.directives {
            let directive = directive
                .parse()
                .map_err(|e| TelemetryError::ConfigError(format!("bad directive {directive}: {e}")))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Build and install the global `tracing` subscriber from `config`.
/// Must be called at most once per process; a second call returns
/// [`TelemetryError::InitError`].
///
/// # Errors
///
/// Returns an error if `config`'s directives don't parse, or if a
/// global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let set = match (&config.format, &config.target) {
        (LogFormat::Json, LogTarget::Stderr) => {
            fmt().json().with_env_filter(filter).with_writer(std::io::stderr).try_init()
        },
        (LogFormat::Pretty, LogTarget::Stderr) => {
            fmt().pretty().with_env_filter(filter).with_writer(std::io::stderr).try_init()
        },
        (LogFormat::Compact, LogTarget::Stderr) => {
            fmt().compact().with_env_filter(filter).with_writer(std::io::stderr).try_init()
        },
        (format, LogTarget::File { directory, prefix }) => {
            let appender = tracing_appender::rolling::daily(directory, prefix);
            // Leaked deliberately: the non-blocking writer's background
            // thread must outlive the subscriber, which lives for the
            // rest of the process.
            let (writer, guard) = tracing_appender::non_blocking(appender);
            Box::leak(Box::new(guard));
            match format {
                LogFormat::Json => fmt().json().with_env_filter(filter).with_writer(writer).try_init(),
                LogFormat::Pretty => {
                    fmt().pretty().with_env_filter(filter).with_writer(writer).try_init()
                },
                LogFormat::Compact => {
                    fmt().compact().with_env_filter(filter).with_writer(writer).try_init()
                },
            }
        },
    };
    set.map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// [`setup_logging`] with `info`-level compact-to-stderr defaults —
/// enough for a process that doesn't need per-crate tuning.
///
/// # Errors
///
/// Returns an error under the same conditions as [`setup_logging`].
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_compact_to_stderr() {
        let config = LogConfig::new("info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(matches!(config.target, LogTarget::Stderr));
    }

    #[test]
    fn bad_directive_is_rejected() {
        let config = LogConfig::new("info").with_directive("not a directive!!");
        assert!(config.env_filter().is_err());
    }

    #[test]
    fn good_directive_is_accepted() {
        let config = LogConfig::new("info").with_directive("arcadia_hooks=trace");
        assert!(config.env_filter().is_ok());
    }
}
