//! Order state machine implementation.
//!
//! Applies the lifecycle rules to stored orders: loads the believed current
//! status, validates the requested transition, persists only on success, and
//! announces the change on the event bus. The check is advisory; it offers
//! no protection against two admin sessions racing on the same order.

use crate::event_bus::EventBus;
use crate::lifecycle;
use comanda_storage::{StorageError, StorageService};
use comanda_types::{Collection, Order, OrderEvent, OrderStatus};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
///
/// These errors represent failures in storage operations, invalid state
/// transitions, or missing orders.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Invalid state transition from {from:?} to {to:?}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("No transition available from {0:?}")]
	NoTransition(OrderStatus),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
}

impl OrderStateError {
	fn from_storage(err: StorageError, order_id: &str) -> Self {
		match err {
			StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
			other => OrderStateError::Storage(other.to_string()),
		}
	}
}

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
	event_bus: EventBus,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>, event_bus: EventBus) -> Self {
		Self { storage, event_bus }
	}

	/// Stores a new order and announces it on the feed
	pub async fn place_order(&self, order: &Order) -> Result<(), OrderStateError> {
		self.storage
			.store(Collection::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))?;

		self.event_bus.publish(OrderEvent::Placed {
			order: order.clone(),
		});
		Ok(())
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.storage
			.retrieve(Collection::Orders.as_str(), order_id)
			.await
			.map_err(|e| OrderStateError::from_storage(e, order_id))
	}

	/// Lists all orders, newest first
	pub async fn list_orders(&self) -> Result<Vec<Order>, OrderStateError> {
		let mut orders: Vec<Order> = self
			.storage
			.retrieve_all(Collection::Orders.as_str())
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))?;

		orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		Ok(orders)
	}

	/// Transitions an order to a new status with validation
	///
	/// The status is the only field this method mutates; items, totals, and
	/// timestamps pass through untouched.
	pub async fn transition_order_status(
		&self,
		order_id: &str,
		new_status: OrderStatus,
	) -> Result<Order, OrderStateError> {
		let mut order = self.get_order(order_id).await?;

		// Validate state transition against the believed current status
		if !lifecycle::is_valid_transition(order.status, new_status) {
			return Err(OrderStateError::InvalidTransition {
				from: order.status,
				to: new_status,
			});
		}

		let previous = order.status;
		order.status = new_status;

		self.storage
			.update(Collection::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| OrderStateError::from_storage(e, order_id))?;

		tracing::info!(
			order_id = %order_id,
			from = %previous,
			to = %new_status,
			"Order status updated"
		);
		self.event_bus.publish(OrderEvent::StatusChanged {
			order_id: order_id.to_string(),
			from: previous,
			to: new_status,
		});

		Ok(order)
	}

	/// Advances an order to the unique next status in the flow
	///
	/// Terminal orders yield a `NoTransition` result rather than corrupting
	/// the stored status.
	pub async fn advance_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		let order = self.get_order(order_id).await?;
		let next = lifecycle::next_status(order.status)
			.ok_or(OrderStateError::NoTransition(order.status))?;

		self.transition_order_status(order_id, next).await
	}

	/// Cancels an order unless it is already terminal
	pub async fn cancel_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.transition_order_status(order_id, OrderStatus::Cancelled)
			.await
	}
}
