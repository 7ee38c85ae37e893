//! Broadcast event bus.
//!
//! One writer per event (the relay or the capture tracker), zero or more UI
//! listeners. `publish` never fails and never blocks: a send onto a bus with
//! no receivers is discarded by contract, not by accident.

use tokio::sync::broadcast;
use tracing::trace;

use crate::job::ProgressEvent;
use crate::selection::SelectionRecord;

/// Events fanned out to every attached UI listener.
#[derive(Debug, Clone)]
pub enum BusEvent {
    VideoProgress(ProgressEvent),
    SelectionUpdated(SelectionRecord),
}

/// Cloneable handle to the broadcast bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BusEvent>,
}

impl EventBus {
    /// Create a bus retaining up to `capacity` undelivered events per
    /// receiver before lagging.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. Fire-and-forget: an empty bus swallows the event.
    pub fn publish(&self, event: BusEvent) {
        if self.tx.send(event).is_err() {
            trace!("bus publish with no listeners attached");
        }
    }

    /// Attach a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    /// Number of currently attached listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
