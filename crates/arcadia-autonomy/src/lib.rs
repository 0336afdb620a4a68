//! Arcadia Autonomy — the Autonomy Manager (§4.5).
//!
//! Gates each tool invocation against the session's current autonomy
//! level, using the Risk Classifier's assessment to derive the level
//! the invocation requires. Tracks a rolling window of gated outcomes
//! per session and promotes after a run of successes or demotes after a
//! run of errors, persisting the result and logging the decision
//! through the session's stores.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod gate;
mod level;

pub use error::{AutonomyError, AutonomyResult};
pub use gate::{AutonomyConfig, AutonomyGate, GateResult, Outcome};
pub use level::{required_level, LevelOverrides};
