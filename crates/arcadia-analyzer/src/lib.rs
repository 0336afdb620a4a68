//! Arcadia Analyzer — the Failure Analyzer (§4.14).
//!
//! A post-hoc pattern matcher over a session's slice of the Event Log:
//! turns a watchdog signal, a detected crash, or a feature regression
//! into a persisted `FailureReport`, gathering the surrounding
//! tool-call context and looking up prior reports in the same category
//! for `similar_past_failures`.
//!
//! Grounded on a signed audit log's range/session-scoped query-helper
//! pattern (`get_session_entries`, `get_entries_in_range`), adapted to
//! scan plain Event Log records instead — the cryptographic
//! chain-verification machinery that pattern was built around has no
//! counterpart here.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod hint;
mod report;

pub use error::{AnalyzerError, AnalyzerResult};
pub use hint::FailureHint;
pub use report::{ok_report, FailureAnalyzer};
