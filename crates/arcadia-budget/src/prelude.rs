//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_budget::prelude::*;
//! ```

pub use crate::{
    BudgetConfig, BudgetError, BudgetOpResult, BudgetResult, BudgetSnapshot, BudgetTracker,
    TokenRates,
};
