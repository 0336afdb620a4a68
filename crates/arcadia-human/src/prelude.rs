//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_human::prelude::*;
//! ```

pub use crate::{
    builtin_rules, evaluate, fingerprint, Escalation, EscalationSignals, HumanError, HumanGateway,
    HumanResult, FEATURE_REGRESSION, IRREVERSIBLE_ACTION, LOW_CONFIDENCE, REPEATED_FAILURE,
};
