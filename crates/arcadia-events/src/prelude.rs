//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_events::prelude::*;
//! ```

pub use crate::{
    DEFAULT_CHANNEL_CAPACITY, Event, EventBus, EventLog, EventMetrics, EventReceiver, EventSink,
    EventsError, EventsResult,
};
