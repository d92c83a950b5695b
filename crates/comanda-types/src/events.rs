//! Event types for live order feeds.
//!
//! Order mutations are broadcast over an event bus so that live consumers
//! (the admin board, the customer tracking view) can react to state changes
//! without polling.

use crate::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Events emitted whenever an order is created or transitioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order has been placed through checkout.
	Placed { order: Order },
	/// An order moved to a new lifecycle status.
	StatusChanged {
		order_id: String,
		from: OrderStatus,
		to: OrderStatus,
	},
}
