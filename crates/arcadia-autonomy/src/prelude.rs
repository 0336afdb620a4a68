//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_autonomy::prelude::*;
//! ```

pub use crate::{
    required_level, AutonomyConfig, AutonomyError, AutonomyGate, AutonomyResult, GateResult,
    LevelOverrides, Outcome,
};
