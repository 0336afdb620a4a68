//! Arcadia Budget — the budget half of Budget & Stall (§4.13).
//!
//! Converts a session's token usage into a running USD total against a
//! configured cap, using a per-1000-token input/output rate table. The
//! stall half (timeout since the last `TOOL_CALL`) is tracked by the
//! Session Supervisor's watchdog directly — there's no dedicated type
//! for a single timestamp comparison.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod budget;
mod error;

pub use budget::{BudgetConfig, BudgetResult, BudgetSnapshot, BudgetTracker, TokenRates};
pub use error::{BudgetError, BudgetOpResult};
