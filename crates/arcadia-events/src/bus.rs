//! In-process broadcast fan-out to live subscribers (the Hook
//! Pipeline's observability stage, the watchdog).

use crate::event::Event;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Broadcasts appended events to every live subscriber.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Arc<Event>>,
}

impl EventBus {
    /// Create a bus with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with an explicit channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers it reached;
    /// zero subscribers is not an error.
    pub fn publish(&self, event: Event) -> usize {
        let event = Arc::new(event);
        trace!(event_type = %event.event_type, "publishing event");
        self.sender.send(Arc::clone(&event)).unwrap_or(0)
    }

    /// Subscribe to future events.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of currently live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to the bus.
pub struct EventReceiver {
    receiver: broadcast::Receiver<Arc<Event>>,
}

impl EventReceiver {
    /// Wait for the next event. Returns `None` once the bus is closed.
    /// A lagging receiver skips the events it missed and keeps going —
    /// it never silently stalls.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event receiver lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
