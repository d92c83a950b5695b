//! Order endpoints: checkout, listing, the kanban board, and lifecycle
//! transitions.
//!
//! Checkout is the only place an order is created: it snapshots line items,
//! computes the totals, and hands the finished order to the state machine.
//! All later mutations go through advance/cancel, never through field edits.

use super::{map_state_error, map_storage_error};
use crate::server::AppState;
use chrono::Utc;
use comanda_core::lifecycle;
use comanda_types::{
	ApiError, BoardResponse, Collection, Order, OrderItem, OrderKind, OrderStatus,
	PlaceOrderRequest,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Creates an order from a checkout request.
///
/// Totals are computed server-side: `subtotal` from the line snapshots, the
/// delivery fee from the restaurant profile for delivery orders, and
/// `total = subtotal + delivery_fee`. Every order starts in `Pending`.
pub async fn place_order(state: &AppState, request: PlaceOrderRequest) -> Result<Order, ApiError> {
	let restaurant = &state.config.restaurant;

	if !restaurant.is_open {
		return Err(ApiError::ServiceUnavailable {
			error_type: "RESTAURANT_CLOSED".to_string(),
			message: "The restaurant is not taking orders right now".to_string(),
			retry_after: None,
		});
	}

	if request.items.is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "EMPTY_ORDER".to_string(),
			message: "An order needs at least one item".to_string(),
			details: None,
		});
	}
	if request.items.iter().any(|item| item.quantity == 0) {
		return Err(ApiError::BadRequest {
			error_type: "INVALID_QUANTITY".to_string(),
			message: "Item quantities must be at least 1".to_string(),
			details: None,
		});
	}
	if request.kind == OrderKind::Delivery && request.address.is_none() {
		return Err(ApiError::BadRequest {
			error_type: "MISSING_ADDRESS".to_string(),
			message: "Delivery orders need a delivery address".to_string(),
			details: None,
		});
	}

	let subtotal: Decimal = request.items.iter().map(OrderItem::line_total).sum();
	if subtotal < restaurant.min_order_value {
		return Err(ApiError::UnprocessableEntity {
			error_type: "BELOW_MINIMUM_ORDER".to_string(),
			message: format!(
				"Order subtotal {} is below the minimum of {}",
				subtotal, restaurant.min_order_value
			),
			details: None,
		});
	}

	let delivery_fee = if request.kind == OrderKind::Delivery {
		restaurant.delivery_fee
	} else {
		Decimal::ZERO
	};

	let order = Order {
		id: Uuid::new_v4().to_string(),
		customer_id: request.customer_id,
		customer_name: request.customer_name,
		customer_phone: request.customer_phone,
		kind: request.kind,
		items: request.items,
		subtotal,
		delivery_fee,
		total: subtotal + delivery_fee,
		status: OrderStatus::Pending,
		created_at: Utc::now(),
		address: if request.kind == OrderKind::Delivery {
			request.address
		} else {
			None
		},
	};

	state
		.state_machine
		.place_order(&order)
		.await
		.map_err(map_state_error)?;

	Ok(order)
}

/// Returns all orders, newest first, cancelled included.
pub async fn list_orders(state: &AppState) -> Result<Vec<Order>, ApiError> {
	state
		.state_machine
		.list_orders()
		.await
		.map_err(map_state_error)
}

/// Returns the kanban board: one column per active status, cancelled orders
/// excluded.
pub async fn get_board(state: &AppState) -> Result<BoardResponse, ApiError> {
	let orders: Vec<Order> = state
		.storage
		.retrieve_all(Collection::Orders.as_str())
		.await
		.map_err(map_storage_error)?;

	Ok(lifecycle::board(&orders))
}

/// Returns a single order for the tracking view.
pub async fn get_order(state: &AppState, order_id: &str) -> Result<Order, ApiError> {
	state
		.state_machine
		.get_order(order_id)
		.await
		.map_err(map_state_error)
}

/// Advances an order to the unique next status in the flow.
pub async fn advance_order(state: &AppState, order_id: &str) -> Result<Order, ApiError> {
	state
		.state_machine
		.advance_order(order_id)
		.await
		.map_err(map_state_error)
}

/// Cancels an order unless it has already reached a terminal status.
pub async fn cancel_order(state: &AppState, order_id: &str) -> Result<Order, ApiError> {
	state
		.state_machine
		.cancel_order(order_id)
		.await
		.map_err(map_state_error)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apis::testing::{closed_state, test_state};
	use comanda_types::Address;

	fn item(name: &str, unit_price: i64, quantity: u32) -> OrderItem {
		OrderItem {
			product_id: "p-1".to_string(),
			name: name.to_string(),
			unit_price: Decimal::from(unit_price),
			quantity,
			observation: None,
		}
	}

	fn pickup_request(items: Vec<OrderItem>) -> PlaceOrderRequest {
		PlaceOrderRequest {
			customer_id: "c-1".to_string(),
			customer_name: "Ana".to_string(),
			customer_phone: "11999990000".to_string(),
			kind: OrderKind::Pickup,
			items,
			address: None,
		}
	}

	fn delivery_request(items: Vec<OrderItem>) -> PlaceOrderRequest {
		PlaceOrderRequest {
			kind: OrderKind::Delivery,
			address: Some(Address {
				street: "Rua das Flores".to_string(),
				number: "123".to_string(),
				neighborhood: "Centro".to_string(),
				city: "São Paulo".to_string(),
				zip_code: None,
				reference: None,
			}),
			..pickup_request(items)
		}
	}

	#[tokio::test]
	async fn test_checkout_computes_totals_for_delivery() {
		let state = test_state();
		let request = delivery_request(vec![item("Burger", 30, 2), item("Fries", 15, 1)]);

		let order = place_order(&state, request).await.unwrap();
		assert_eq!(order.subtotal, Decimal::from(75));
		assert_eq!(order.delivery_fee, Decimal::new(500, 2));
		assert_eq!(order.total, Decimal::new(8000, 2));
		assert_eq!(order.status, OrderStatus::Pending);
		assert!(order.address.is_some());
	}

	#[tokio::test]
	async fn test_checkout_pickup_has_no_delivery_fee() {
		let state = test_state();
		let order = place_order(&state, pickup_request(vec![item("Burger", 30, 1)]))
			.await
			.unwrap();

		assert_eq!(order.delivery_fee, Decimal::ZERO);
		assert_eq!(order.total, order.subtotal);
		assert!(order.address.is_none());
	}

	#[tokio::test]
	async fn test_checkout_rejected_when_closed() {
		let state = closed_state();
		let result = place_order(&state, pickup_request(vec![item("Burger", 30, 1)])).await;

		assert!(matches!(
			result,
			Err(ApiError::ServiceUnavailable { .. })
		));
	}

	#[tokio::test]
	async fn test_checkout_rejects_empty_cart() {
		let state = test_state();
		let result = place_order(&state, pickup_request(Vec::new())).await;
		assert!(matches!(result, Err(ApiError::BadRequest { .. })));
	}

	#[tokio::test]
	async fn test_checkout_rejects_subtotal_below_minimum() {
		let state = test_state();
		let result = place_order(&state, pickup_request(vec![item("Water", 4, 1)])).await;
		assert!(matches!(
			result,
			Err(ApiError::UnprocessableEntity { .. })
		));
	}

	#[tokio::test]
	async fn test_checkout_rejects_delivery_without_address() {
		let state = test_state();
		let mut request = delivery_request(vec![item("Burger", 30, 1)]);
		request.address = None;

		let result = place_order(&state, request).await;
		assert!(matches!(result, Err(ApiError::BadRequest { .. })));
	}

	#[tokio::test]
	async fn test_advance_and_cancel_endpoints() {
		let state = test_state();
		let order = place_order(&state, pickup_request(vec![item("Burger", 30, 1)]))
			.await
			.unwrap();

		let advanced = advance_order(&state, &order.id).await.unwrap();
		assert_eq!(advanced.status, OrderStatus::Accepted);

		let cancelled = cancel_order(&state, &order.id).await.unwrap();
		assert_eq!(cancelled.status, OrderStatus::Cancelled);

		// Terminal: further moves conflict
		let result = advance_order(&state, &order.id).await;
		assert!(matches!(result, Err(ApiError::Conflict { .. })));
	}

	#[tokio::test]
	async fn test_unknown_order_is_not_found() {
		let state = test_state();
		let result = get_order(&state, "ghost").await;
		assert!(matches!(result, Err(ApiError::NotFound { .. })));
	}

	#[tokio::test]
	async fn test_board_excludes_cancelled_orders() {
		let state = test_state();
		let kept = place_order(&state, pickup_request(vec![item("Burger", 30, 1)]))
			.await
			.unwrap();
		let dropped = place_order(&state, pickup_request(vec![item("Fries", 25, 1)]))
			.await
			.unwrap();
		cancel_order(&state, &dropped.id).await.unwrap();

		let board = get_board(&state).await.unwrap();
		let all_ids: Vec<String> = board
			.columns
			.iter()
			.flat_map(|c| c.orders.iter().map(|o| o.id.clone()))
			.collect();
		assert_eq!(all_ids, vec![kept.id]);
	}
}
