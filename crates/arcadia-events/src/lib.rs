//! Arcadia Events — the Event Log (§4.2).
//!
//! A checksummed, append-only JSONL file is the durable record; an
//! in-process broadcast bus fans appended events out to live
//! subscribers (the Hook Pipeline's observability stage, the watchdog).
//! [`EventLog`] owns both and assigns monotonic ids on append.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod error;
mod event;
mod log;
mod sink;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};
pub use error::{EventsError, EventsResult};
pub use event::Event;
pub use log::{EventLog, EventMetrics};
pub use sink::EventSink;
