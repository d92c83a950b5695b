//! Order lifecycle rules.
//!
//! Orders move through a fixed forward sequence
//! (pending -> accepted -> in_kitchen -> out_for_delivery -> delivered) with
//! cancellation as a terminal side-state reachable from any non-terminal
//! status. This module holds the pure rules: the unique next status, the
//! transition legality table, the kanban grouping, and the revenue inclusion
//! rule shared by every aggregate.

use comanda_types::{BoardColumn, BoardResponse, Order, OrderStatus};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// The fixed forward sequence of active statuses.
///
/// Every order starts at the head of this sequence; `advance` walks it one
/// step at a time. `Cancelled` is deliberately absent.
pub const STATUS_FLOW: [OrderStatus; 5] = [
	OrderStatus::Pending,
	OrderStatus::Accepted,
	OrderStatus::InKitchen,
	OrderStatus::OutForDelivery,
	OrderStatus::Delivered,
];

/// Returns the unique next status in the flow, or None when the order is at
/// a terminal status (`Delivered` or `Cancelled`).
pub fn next_status(current: OrderStatus) -> Option<OrderStatus> {
	let idx = STATUS_FLOW.iter().position(|s| *s == current)?;
	STATUS_FLOW.get(idx + 1).copied()
}

/// Whether an order in the given status may still be cancelled.
///
/// Cancellation is legal from any status except `Delivered` and `Cancelled`
/// itself; re-cancelling is disallowed.
pub fn can_cancel(current: OrderStatus) -> bool {
	!matches!(current, OrderStatus::Delivered | OrderStatus::Cancelled)
}

/// Checks if a state transition is valid.
///
/// Each active status admits exactly two moves: one step forward in the flow
/// or cancellation. Backward moves and moves out of a terminal status are
/// rejected.
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
	// Static transition table - each state maps to allowed next states
	static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
		let mut m = HashMap::new();
		for status in STATUS_FLOW {
			let mut allowed = HashSet::new();
			if let Some(next) = next_status(status) {
				allowed.insert(next);
			}
			if can_cancel(status) {
				allowed.insert(OrderStatus::Cancelled);
			}
			m.insert(status, allowed);
		}
		m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
		m
	});

	TRANSITIONS
		.get(&from)
		.is_some_and(|set| set.contains(&to))
}

/// Whether orders in the given status count toward revenue aggregates.
///
/// Only cancelled orders are excluded; every active status, including
/// `Pending`, contributes.
pub fn counts_toward_revenue(status: OrderStatus) -> bool {
	status != OrderStatus::Cancelled
}

/// Groups orders into kanban columns, one per active status.
///
/// Within each column orders are sorted newest first. Cancelled orders are
/// excluded from the board entirely; they remain queryable through the
/// regular order listing.
pub fn board(orders: &[Order]) -> BoardResponse {
	let mut columns: Vec<BoardColumn> = STATUS_FLOW
		.iter()
		.map(|status| BoardColumn {
			status: *status,
			orders: Vec::new(),
		})
		.collect();

	for order in orders {
		if let Some(column) = columns.iter_mut().find(|c| c.status == order.status) {
			column.orders.push(order.clone());
		}
	}

	for column in &mut columns {
		column.orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	}

	BoardResponse { columns }
}
