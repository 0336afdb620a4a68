//! Arcadia Telemetry — `tracing`/`tracing-subscriber` setup (ambient
//! stack, §2.1): structured, leveled logging with per-crate directives
//! and a pluggable format (compact for a terminal, JSON for a
//! supervisor running unattended), plus a correlation-id request
//! context threaded through a turn or tool invocation's span.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcadia_telemetry::{LogConfig, LogFormat, setup_logging, RequestContext};
//!
//! # fn main() -> Result<(), arcadia_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("arcadia_hooks=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("supervisor").with_operation("run_turn");
//! let _guard = ctx.enter();
//! tracing::info!("running turn");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{setup_default_logging, setup_logging, LogConfig, LogFormat, LogTarget};
