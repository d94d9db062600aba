use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::types::BusEvent;

/// In-process publish/subscribe channel shared by every component.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BusEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event and return how many subscribers received it.
    /// Nobody listening is not an error.
    pub fn publish(&self, event: BusEvent) -> usize {
        let topic = event.topic();
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!("Published {} to {} subscriber(s)", topic, receivers);
                receivers
            }
            Err(_) => {
                tracing::debug!("Published {} with no subscribers", topic);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    pub fn stream(&self) -> BroadcastStream<BusEvent> {
        BroadcastStream::new(self.tx.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
