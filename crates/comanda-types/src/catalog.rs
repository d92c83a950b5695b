//! Catalog types for the comanda platform.
//!
//! Products and categories have independent lifecycles managed through admin
//! CRUD. Orders reference products only via denormalized snapshots, so
//! catalog mutation never retroactively changes historical order data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog item offered on the menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Unique identifier, immutable.
	pub id: String,
	/// Category this product is listed under.
	pub category_id: String,
	pub name: String,
	pub description: String,
	pub base_price: Decimal,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	/// Inactive products are hidden from the customer menu but keep their
	/// catalog entry.
	pub is_active: bool,
	/// Free-form tags for filtering and promotion.
	#[serde(default)]
	pub tags: Vec<String>,
}

/// A named grouping of products with a manual display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	/// Unique identifier, immutable.
	pub id: String,
	pub name: String,
	/// Manual position in the menu, ascending.
	pub display_order: i64,
	pub is_active: bool,
}
