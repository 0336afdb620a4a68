//! Arcadia Test — shared test fixtures (ambient stack, §2.1): a
//! temporary project-directory builder, an in-memory [`AgentRuntime`]
//! stub that plays back a scripted tool-call sequence, and Event Log
//! assertion helpers.
//!
//! [`AgentRuntime`]: arcadia_core::AgentRuntime
//!
//! # Usage
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use arcadia_test::{temp_project, ScriptedRuntime};
//!
//!     #[tokio::test]
//!     async fn runs_a_scripted_turn() {
//!         let project = temp_project();
//!         let runtime = ScriptedRuntime::new(vec![ScriptedRuntime::completed_turn()]);
//!         let _ = project.home.ensure();
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod assertions;
pub mod fixtures;
pub mod mocks;
pub mod prelude;

pub use assertions::assert_event_sequence;
pub use fixtures::{temp_project, TempProject};
pub use mocks::{ScriptedRuntime, ScriptedRuntimeError};
