//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_checkpoint::prelude::*;
//! ```

pub use crate::{CheckpointError, CheckpointManager, CheckpointResult};
