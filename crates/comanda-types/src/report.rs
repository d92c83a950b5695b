//! Derived reporting types for the comanda platform.
//!
//! These types are the outputs of the pure reporting computations in
//! `comanda-core`: the RFV customer segmentation and the dashboard
//! aggregation. None of them is persisted; each report is recomputed from an
//! order/customer snapshot on every request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RFV segment labels, mutually exclusive.
///
/// Classification is an ordered, first-match decision list; the enum order
/// here carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
	/// Frequent recent buyer.
	Champion,
	/// Regular buyer.
	Loyal,
	/// Lead (never purchased) or recent first-time buyer.
	New,
	/// Has not bought in over a month.
	AtRisk,
	/// Gone quiet for three months or more.
	Lost,
}

impl Segment {
	pub fn as_str(&self) -> &'static str {
		match self {
			Segment::Champion => "champion",
			Segment::Loyal => "loyal",
			Segment::New => "new",
			Segment::AtRisk => "at_risk",
			Segment::Lost => "lost",
		}
	}
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Per-customer RFV metrics and segment assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
	pub id: String,
	pub name: String,
	pub phone: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Count of non-cancelled orders.
	pub total_orders: u32,
	/// Lifetime value: sum of non-cancelled order totals.
	pub total_spent: Decimal,
	/// Most recent qualifying order, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_order_at: Option<DateTime<Utc>>,
	/// Whole days since the last qualifying order, rounded up; a sentinel
	/// value when the customer never ordered.
	pub days_since_last_order: i64,
	pub segment: Segment,
}

impl CustomerProfile {
	/// Average spend per order. Only meaningful for customers with at least
	/// one qualifying order.
	pub fn average_ticket(&self) -> Decimal {
		if self.total_orders == 0 {
			Decimal::ZERO
		} else {
			self.total_spent / Decimal::from(self.total_orders)
		}
	}
}

/// Count of customers per segment, over the full classified set (leads
/// included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCounts {
	pub champion: usize,
	pub loyal: usize,
	pub new: usize,
	pub at_risk: usize,
	pub lost: usize,
}

impl SegmentCounts {
	/// Records one customer in the matching bucket.
	pub fn record(&mut self, segment: Segment) {
		match segment {
			Segment::Champion => self.champion += 1,
			Segment::Loyal => self.loyal += 1,
			Segment::New => self.new += 1,
			Segment::AtRisk => self.at_risk += 1,
			Segment::Lost => self.lost += 1,
		}
	}
}

/// Output of the segmentation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
	/// Count of customers with at least one qualifying order.
	pub total_customers: usize,
	/// Average lifetime value over those customers; zero when there are none.
	pub average_ltv: Decimal,
	/// Segment counts over the full classified set, leads included.
	pub segment_counts: SegmentCounts,
	/// Customers with at least one qualifying order, ranked by lifetime value
	/// descending. Ties keep input order.
	pub customers: Vec<CustomerProfile>,
}

/// Count of orders per status, over all orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
	pub pending: usize,
	pub accepted: usize,
	pub in_kitchen: usize,
	pub out_for_delivery: usize,
	pub delivered: usize,
	pub cancelled: usize,
}

impl StatusBreakdown {
	pub fn record(&mut self, status: crate::OrderStatus) {
		use crate::OrderStatus;
		match status {
			OrderStatus::Pending => self.pending += 1,
			OrderStatus::Accepted => self.accepted += 1,
			OrderStatus::InKitchen => self.in_kitchen += 1,
			OrderStatus::OutForDelivery => self.out_for_delivery += 1,
			OrderStatus::Delivered => self.delivered += 1,
			OrderStatus::Cancelled => self.cancelled += 1,
		}
	}
}

/// One row of the best-sellers table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
	/// Product name snapshot as recorded on order lines.
	pub name: String,
	/// Units sold across non-cancelled orders.
	pub quantity: u64,
	/// Revenue generated across non-cancelled orders.
	pub revenue: Decimal,
}

/// Output of the dashboard aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
	/// Sum of order totals, cancelled orders excluded.
	pub total_revenue: Decimal,
	/// Count of all orders, cancelled included (volume metric).
	pub total_orders: usize,
	/// Count of registered customers.
	pub customer_count: usize,
	/// Revenue divided by the non-cancelled order count; zero when there are
	/// no such orders.
	pub average_ticket: Decimal,
	/// Revenue placed on the report's calendar day, cancelled excluded.
	pub today_revenue: Decimal,
	/// Orders placed on the report's calendar day, cancelled included.
	pub today_orders: usize,
	pub status_breakdown: StatusBreakdown,
	/// Best sellers by units sold, at most five rows.
	pub top_products: Vec<TopProduct>,
}
