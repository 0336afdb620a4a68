//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_features::prelude::*;
//! ```

pub use crate::{FeatureError, FeatureRegistry, FeatureResult};
