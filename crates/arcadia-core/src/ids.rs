//! Typed identifiers for every entity in the data model.
//!
//! Rows carry a monotonically assigned integer id per §3; tool
//! invocations additionally carry a [`InvocationId`] (a UUID) so a
//! `TOOL_CALL` event can be correlated with its eventual
//! `TOOL_RESULT`/`TOOL_ERROR`/`TOOL_BLOCKED` event even though both are
//! appended independently to the log.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! int_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw row id.
            #[must_use]
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw row id.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

int_id!(SessionId, "Identifies one row in the Session table.");
int_id!(FeatureId, "Identifies one row in the Feature table (its `index`).");
int_id!(CheckpointId, "Identifies one row in the Checkpoint table.");
int_id!(ArtifactId, "Identifies one row in the Artifact table.");
int_id!(DecisionId, "Identifies one row in the Decision table.");
int_id!(HypothesisId, "Identifies one row in the Hypothesis table.");
int_id!(InjectionPointId, "Identifies one row in the Injection Point table.");
int_id!(InterventionId, "Identifies one row in the Intervention table.");
int_id!(EventId, "Identifies one row appended to the Event Log.");
int_id!(FailureReportId, "Identifies one row in the Failure Report table.");

/// Correlates a `TOOL_CALL` event with its eventual `TOOL_RESULT`,
/// `TOOL_ERROR`, or `TOOL_BLOCKED` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    /// Mint a fresh invocation id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
