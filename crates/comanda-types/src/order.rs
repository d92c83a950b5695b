//! Order types for the comanda platform.
//!
//! This module defines the order entity, its line items, and the status
//! enumeration that drives the order lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents one customer purchase.
///
/// An order is created by the checkout flow in `Pending` state and is only
/// ever mutated through status transitions. It is never deleted; cancellation
/// is a terminal status, not a removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier for this order, assigned at creation.
	pub id: String,
	/// Reference to the placing customer. Not validated against customer
	/// existence: orders may outlive their customer record.
	pub customer_id: String,
	/// Customer name snapshot taken at checkout.
	pub customer_name: String,
	/// Customer phone snapshot taken at checkout.
	pub customer_phone: String,
	/// Whether this order is delivered or picked up at the counter.
	pub kind: OrderKind,
	/// Line items with denormalized product snapshots.
	pub items: Vec<OrderItem>,
	/// Sum of line item totals.
	pub subtotal: Decimal,
	/// Delivery fee applied at checkout; zero for pickup orders.
	pub delivery_fee: Decimal,
	/// Invariant: `total = subtotal + delivery_fee`, enforced by the checkout
	/// flow and never recomputed downstream.
	pub total: Decimal,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Delivery address; present iff `kind` is `Delivery`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<Address>,
}

/// One line of an order.
///
/// The product name and unit price are snapshots: renaming or deleting the
/// product later never changes historical order data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
	/// Identifier of the product this line was built from.
	pub product_id: String,
	/// Product name snapshot.
	pub name: String,
	/// Unit price snapshot.
	pub unit_price: Decimal,
	/// Quantity ordered, always at least 1.
	pub quantity: u32,
	/// Free-text note from the customer (e.g. "no onions").
	#[serde(skip_serializing_if = "Option::is_none")]
	pub observation: Option<String>,
}

impl OrderItem {
	/// Line total: unit price times quantity.
	pub fn line_total(&self) -> Decimal {
		self.unit_price * Decimal::from(self.quantity)
	}
}

/// Delivery address attached to delivery orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
	pub street: String,
	pub number: String,
	pub neighborhood: String,
	pub city: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zip_code: Option<String>,
	/// Free-text landmark hint for the courier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
}

/// Fulfillment mode of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
	/// Delivered to the customer's address.
	Delivery,
	/// Picked up at the counter.
	Pickup,
}

/// Status of an order in its lifecycle.
///
/// The five active statuses form a fixed forward sequence
/// (`Pending -> Accepted -> InKitchen -> OutForDelivery -> Delivered`);
/// `Cancelled` is a terminal side-state reachable from any non-terminal
/// status. Transition legality lives in `comanda-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Order has been placed and awaits acceptance.
	Pending,
	/// Order has been accepted by the restaurant.
	Accepted,
	/// Order is being prepared.
	InKitchen,
	/// Order has left for delivery (or is ready for pickup).
	OutForDelivery,
	/// Order has been delivered and is complete.
	Delivered,
	/// Order was cancelled. Terminal.
	Cancelled,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Accepted => "accepted",
			OrderStatus::InKitchen => "in_kitchen",
			OrderStatus::OutForDelivery => "out_for_delivery",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
