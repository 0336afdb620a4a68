//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_risk::prelude::*;
//! ```

pub use crate::{RiskAssessment, RiskClassifier, RiskError, RiskResult, ToolInvocation};
