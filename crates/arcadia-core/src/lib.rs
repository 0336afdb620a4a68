//! Arcadia Core - shared ids, error taxonomy, directory layout, and the
//! agent-runtime seam used across every Arcadia Forge crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod dirs;
pub mod error;
pub mod event_type;
pub mod ids;
pub mod runtime;

pub use dirs::ProjectHome;
pub use error::{ArcadiaError, ArcadiaResult};
pub use event_type::EventType;
pub use ids::{
    ArtifactId, CheckpointId, DecisionId, EventId, FailureReportId, FeatureId, HypothesisId,
    InjectionPointId, InterventionId, InvocationId, SessionId,
};
pub use runtime::{AgentRuntime, RuntimeEvent, RuntimeTurn, TokenUsage, ToolCatalogEntry};
