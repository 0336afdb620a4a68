//! Arcadia Prelude — re-exports the public surface of every component
//! crate (ambient stack, §2.1), for embedding the whole system with
//! one import instead of depending on each crate individually.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arcadia_prelude::*;
//!
//! // Now in scope:
//! // - arcadia-core (ids, AgentRuntime, ProjectHome)
//! // - arcadia-storage (Database, FeatureStore, ...)
//! // - arcadia-events (EventLog, Event)
//! // - arcadia-security, arcadia-risk (the gate the Hook Pipeline runs)
//! // - arcadia-budget, arcadia-autonomy, arcadia-checkpoint (session controls)
//! // - arcadia-memory, arcadia-features, arcadia-human (state components)
//! // - arcadia-hooks (the pipeline tying them together)
//! // - arcadia-tools, arcadia-analyzer (tool dispatch, failure analysis)
//! // - arcadia-supervisor (the session state machine)
//! // - arcadia-telemetry (logging setup)
//! ```
//!
//! # Per-Crate Preludes
//!
//! Pull in only one component's types with its own prelude:
//!
//! ```rust,ignore
//! use arcadia_core::prelude::*;
//! use arcadia_hooks::prelude::*;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub use arcadia_core::prelude::*;
pub use arcadia_events::prelude::*;
pub use arcadia_security::prelude::*;
pub use arcadia_risk::prelude::*;
pub use arcadia_budget::prelude::*;
pub use arcadia_autonomy::prelude::*;
pub use arcadia_checkpoint::prelude::*;
pub use arcadia_memory::prelude::*;
pub use arcadia_features::prelude::*;
pub use arcadia_hooks::prelude::*;
pub use arcadia_human::prelude::*;
pub use arcadia_supervisor::prelude::*;
pub use arcadia_telemetry::prelude::*;

// No per-crate prelude module; re-export the public surface directly.
pub use arcadia_analyzer::*;
pub use arcadia_storage::{
    Database, FailureReportStore, FeatureStore, MemoryStore, SessionStore,
};
pub use arcadia_tools::*;
