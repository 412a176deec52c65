use tokio::sync::broadcast;

/// Events emitted after a listing write has committed.
#[derive(Debug, Clone)]
pub enum ListingEvent {
    /// A new listing entered the moderation queue.
    Submitted { id: i64, name: String },
    /// An admin approved a pending listing.
    Approved {
        id: i64,
        name: String,
        owner_email: String,
    },
}

/// Broadcast fan-out for listing events.
///
/// Slow subscribers lag and drop rather than backpressure publishers; a
/// publish with no subscribers is a no-op.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ListingEvent>,
}

const BUS_CAPACITY: usize = 1024;

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: ListingEvent) {
        // Err only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListingEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(ListingEvent::Submitted {
            id: 7,
            name: "Panadería San Martín".into(),
        });
        match rx.recv().await {
            Ok(ListingEvent::Submitted { id, name }) => {
                assert_eq!(id, 7);
                assert_eq!(name, "Panadería San Martín");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(ListingEvent::Submitted {
            id: 1,
            name: "x".into(),
        });
    }
}
