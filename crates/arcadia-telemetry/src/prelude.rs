//! Convenience re-exports: `use arcadia_telemetry::prelude::*;`

pub use crate::{setup_default_logging, setup_logging};
pub use crate::{LogConfig, LogFormat, LogTarget};
pub use crate::{RequestContext, RequestGuard};
pub use crate::{TelemetryError, TelemetryResult};
