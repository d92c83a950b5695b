//! Event bus for broadcasting order updates.
//!
//! Order creations and status transitions are published here so that live
//! consumers (the admin board feed, the customer tracking view) can react
//! without polling storage. Broadcast semantics: slow subscribers may miss
//! events and are expected to re-read on reconnect.

use comanda_types::OrderEvent;
use tokio::sync::broadcast;

/// Broadcast channel for order events.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<OrderEvent>,
}

impl EventBus {
	/// Creates a new event bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Events published while nobody is subscribed are dropped.
	pub fn publish(&self, event: OrderEvent) {
		if self.sender.send(event).is_err() {
			tracing::trace!("No active subscribers for order event");
		}
	}

	/// Creates a new subscription receiving all events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
		self.sender.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use comanda_types::OrderStatus;

	#[tokio::test]
	async fn test_subscriber_receives_published_event() {
		let bus = EventBus::new(16);
		let mut receiver = bus.subscribe();

		bus.publish(OrderEvent::StatusChanged {
			order_id: "o-1".to_string(),
			from: OrderStatus::Pending,
			to: OrderStatus::Accepted,
		});

		match receiver.recv().await.unwrap() {
			OrderEvent::StatusChanged { order_id, from, to } => {
				assert_eq!(order_id, "o-1");
				assert_eq!(from, OrderStatus::Pending);
				assert_eq!(to, OrderStatus::Accepted);
			}
			other => panic!("Unexpected event: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_publish_without_subscribers_is_silent() {
		let bus = EventBus::new(16);
		// Must not panic or block
		bus.publish(OrderEvent::StatusChanged {
			order_id: "o-2".to_string(),
			from: OrderStatus::Pending,
			to: OrderStatus::Cancelled,
		});
	}
}
