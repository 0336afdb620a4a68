//! Arcadia Hooks — the Hook Pipeline (§4.9).
//!
//! The fixed stage sequence every tool invocation passes through before
//! it reaches the Tool Registry: Security Gate, Risk Classifier,
//! Autonomy Manager, Checkpoint Manager, and Observability on the way
//! in; Observability, autonomy-metrics update, and a
//! `FEATURE_COMPLETE` checkpoint on the way out. Hooks are pure
//! functions over context that return decisions — they don't perform
//! I/O other than through the State Store, the Event Log, and the
//! two trait seams ([`ToolExecutor`], [`ApprovalGateway`]) the Tool
//! Registry and Human Channel implement.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod approval;
mod context;
mod error;
mod executor;
mod pipeline;

pub use approval::{ApprovalGateway, ApprovalOutcome};
pub use context::{PipelineTrigger, ToolCallContext};
pub use error::{HookError, HookResult};
pub use executor::{ToolExecutor, ToolFailure, ToolOutcome};
pub use pipeline::{HookPipeline, PipelineOutcome};
