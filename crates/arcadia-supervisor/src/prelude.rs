//! Commonly used types for convenient import.
//!
//! ```rust,no_run
//! use arcadia_supervisor::prelude::*;
//! ```

pub use crate::{
    ExitStatus, PausedSession, SessionOutcome, SettleResult, Supervisor, SupervisorError,
    SupervisorLock, SupervisorResult, SupervisorState, Watchdog, WatchdogConfig, WatchdogFlag,
};
