//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_security::prelude::*;
//! ```

pub use crate::{GateDecision, SecurityError, SecurityPolicy, SecurityResult, ToolAction};
