//! Arcadia Features — the Feature Registry (§4.7).
//!
//! A thin layer over [`arcadia_storage::FeatureStore`] adding the
//! business logic that doesn't belong at the storage layer: computing
//! the related-feature context the salience formula consults, and the
//! full `next_by_salience` selection contract (dependencies that have
//! since passed unblock a feature; `skip_blocked` surfaces blocked work
//! instead of hiding it).

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod registry;

pub use error::{FeatureError, FeatureResult};
pub use registry::FeatureRegistry;
