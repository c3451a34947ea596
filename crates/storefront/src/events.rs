//! Cart change notifications.
//!
//! The cart store owns a broadcast channel; anything that shows cart-derived
//! data (a badge counter, a totals footer) subscribes and re-reads the
//! store's snapshot when an event arrives. Events carry no payload.

use tokio::sync::broadcast;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_BUFFER: usize = 16;

/// Something about the cart changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// A cart mutation completed.
    Updated,
}

/// Sending half of the cart event channel.
#[derive(Debug, Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartEvent>,
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl CartEvents {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    /// Register a listener.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Broadcast `event`. Having no subscribers is not an error.
    pub fn emit(&self, event: CartEvent) {
        let _ = self.sender.send(event);
    }
}
