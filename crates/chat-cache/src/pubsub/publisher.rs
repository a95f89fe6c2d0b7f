//! Broadcast publisher for cache updates.
//!
//! Delivers every [`Update`] to all current subscribers. A subscriber that
//! falls more than the buffer size behind loses the oldest updates; since
//! each update carries full state, the next one brings it back in sync.

use chat_core::{NotificationSink, Update};
use tokio::sync::broadcast;

/// Broadcasts updates to any number of subscribers
#[derive(Debug, Clone)]
pub struct UpdatePublisher {
    tx: broadcast::Sender<Update>,
}

impl UpdatePublisher {
    /// Create a publisher buffering up to `buffer` updates per subscriber
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Update> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an update, returning how many subscribers it reached
    pub fn publish(&self, update: Update) -> usize {
        let event_type = update.event_type();
        match self.tx.send(update) {
            Ok(receivers) => {
                tracing::debug!(event_type = %event_type, receivers = receivers, "Published update");
                receivers
            }
            Err(_) => {
                tracing::trace!(event_type = %event_type, "No subscribers for update");
                0
            }
        }
    }
}

impl NotificationSink for UpdatePublisher {
    fn notify(&self, update: Update) {
        self.publish(update);
    }
}
