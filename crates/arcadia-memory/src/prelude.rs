//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_memory::prelude::*;
//! ```

pub use crate::{MemoryError, MemoryManager, MemoryResult, Tier, WarmSummary, DEFAULT_WARM_RETENTION};
