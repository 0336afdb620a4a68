//! Arcadia Risk — the Risk Classifier (§4.4).
//!
//! For each tool invocation the Hook Pipeline is about to run, produces
//! a [`RiskAssessment`]: a 1-5 risk level, reversibility and
//! side-effect flags, and the approval/checkpoint/review gates it
//! trips. Classification checks a configured pattern table first, then
//! falls back to a built-in default per invocation kind. The assessment
//! feeds the Autonomy Manager's allow/gate/deny decision and the
//! Checkpoint Manager's pre-exec snapshot decision — this crate never
//! makes either decision itself.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod action;
mod error;
mod request;

pub use action::ToolInvocation;
pub use error::{RiskError, RiskResult};
pub use request::{RiskAssessment, RiskClassifier};
