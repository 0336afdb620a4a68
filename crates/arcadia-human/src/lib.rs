//! Arcadia Human — the Human Channel (§4.10).
//!
//! Injection Points, Escalation Rules, and Intervention Learning: the
//! durable, out-of-process escape hatch the rest of the system uses
//! whenever it needs a human. [`HumanGateway`] implements
//! `arcadia_hooks::ApprovalGateway`, so the Hook Pipeline's approval
//! stage opens a pending row and blocks on it the same way the
//! Session Supervisor blocks on a pause request — a human (CLI or
//! dashboard) resolves it by writing directly to the store. Repeated
//! matching resolutions teach a signature-keyed
//! [`arcadia_storage::models::InterventionPattern`] to auto-apply,
//! short-circuiting future requests with the same shape.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod gateway;
mod learning;
mod rules;
mod signature;

pub use error::{HumanError, HumanResult};
pub use gateway::HumanGateway;
pub use rules::{
    builtin_rules, evaluate, Escalation, EscalationSignals, FEATURE_REGRESSION,
    IRREVERSIBLE_ACTION, LOW_CONFIDENCE, REPEATED_FAILURE,
};
pub use signature::fingerprint;
