//! Dashboard aggregation over order snapshots.
//!
//! A single pass over all orders producing the admin KPIs: revenue, volume,
//! average ticket, same-day buckets, the status breakdown, and the
//! best-sellers table. Revenue metrics exclude cancelled orders; volume
//! metrics count them.

use crate::lifecycle;
use chrono::{DateTime, Utc};
use comanda_types::{DashboardReport, Order, StatusBreakdown, TopProduct};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Maximum number of rows in the best-sellers table.
const TOP_PRODUCTS_LIMIT: usize = 5;

/// Computes the dashboard report for an order snapshot.
///
/// `customer_count` is the size of the registered customer base; `now`
/// anchors the same-day buckets and is injected for reproducibility.
pub fn dashboard(orders: &[Order], customer_count: usize, now: DateTime<Utc>) -> DashboardReport {
	let today = now.date_naive();

	let mut total_revenue = Decimal::ZERO;
	let mut counted_orders = 0usize;
	let mut today_revenue = Decimal::ZERO;
	let mut today_orders = 0usize;
	let mut status_breakdown = StatusBreakdown::default();

	// Best sellers keyed by name snapshot; insertion order breaks ties
	let mut product_rows: Vec<TopProduct> = Vec::new();
	let mut product_index: HashMap<String, usize> = HashMap::new();

	for order in orders {
		let counts = lifecycle::counts_toward_revenue(order.status);
		status_breakdown.record(order.status);

		if counts {
			total_revenue += order.total;
			counted_orders += 1;
		}

		if order.created_at.date_naive() == today {
			today_orders += 1;
			if counts {
				today_revenue += order.total;
			}
		}

		if counts {
			for item in &order.items {
				let idx = *product_index.entry(item.name.clone()).or_insert_with(|| {
					product_rows.push(TopProduct {
						name: item.name.clone(),
						quantity: 0,
						revenue: Decimal::ZERO,
					});
					product_rows.len() - 1
				});
				product_rows[idx].quantity += u64::from(item.quantity);
				product_rows[idx].revenue += item.line_total();
			}
		}
	}

	let average_ticket = if counted_orders == 0 {
		Decimal::ZERO
	} else {
		total_revenue / Decimal::from(counted_orders as u64)
	};

	product_rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
	product_rows.truncate(TOP_PRODUCTS_LIMIT);

	DashboardReport {
		total_revenue,
		total_orders: orders.len(),
		customer_count,
		average_ticket,
		today_revenue,
		today_orders,
		status_breakdown,
		top_products: product_rows,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};
	use comanda_types::{OrderItem, OrderKind, OrderStatus};

	fn fixed_now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap()
	}

	fn order(id: &str, status: OrderStatus, total: i64, hours_ago: i64) -> Order {
		Order {
			id: id.to_string(),
			customer_id: "c-1".to_string(),
			customer_name: "Ana".to_string(),
			customer_phone: "11999990000".to_string(),
			kind: OrderKind::Pickup,
			items: Vec::new(),
			subtotal: Decimal::from(total),
			delivery_fee: Decimal::ZERO,
			total: Decimal::from(total),
			status,
			created_at: fixed_now() - Duration::hours(hours_ago),
			address: None,
		}
	}

	fn item(name: &str, unit_price: i64, quantity: u32) -> OrderItem {
		OrderItem {
			product_id: "p-1".to_string(),
			name: name.to_string(),
			unit_price: Decimal::from(unit_price),
			quantity,
			observation: None,
		}
	}

	#[test]
	fn test_revenue_excludes_cancelled_orders() {
		let orders = vec![
			order("o-1", OrderStatus::Delivered, 50, 2),
			order("o-2", OrderStatus::Cancelled, 999, 1),
		];

		let report = dashboard(&orders, 10, fixed_now());
		assert_eq!(report.total_revenue, Decimal::from(50));
		// Volume counts every order
		assert_eq!(report.total_orders, 2);
		assert_eq!(report.customer_count, 10);
	}

	#[test]
	fn test_pending_orders_count_toward_revenue() {
		let orders = vec![
			order("o-1", OrderStatus::Pending, 30, 1),
			order("o-2", OrderStatus::Delivered, 20, 2),
		];

		let report = dashboard(&orders, 0, fixed_now());
		assert_eq!(report.total_revenue, Decimal::from(50));
		assert_eq!(report.average_ticket, Decimal::from(25));
	}

	#[test]
	fn test_average_ticket_is_zero_when_everything_cancelled() {
		let orders = vec![
			order("o-1", OrderStatus::Cancelled, 30, 1),
			order("o-2", OrderStatus::Cancelled, 20, 2),
		];

		let report = dashboard(&orders, 0, fixed_now());
		assert_eq!(report.average_ticket, Decimal::ZERO);
		assert_eq!(report.total_revenue, Decimal::ZERO);
	}

	#[test]
	fn test_today_buckets_use_calendar_day() {
		let orders = vec![
			order("today-1", OrderStatus::Delivered, 40, 2),
			order("today-2", OrderStatus::Cancelled, 70, 5),
			order("yesterday", OrderStatus::Delivered, 90, 30),
		];

		let report = dashboard(&orders, 0, fixed_now());
		assert_eq!(report.today_orders, 2);
		assert_eq!(report.today_revenue, Decimal::from(40));
	}

	#[test]
	fn test_status_breakdown_counts_all_statuses() {
		let orders = vec![
			order("o-1", OrderStatus::Pending, 10, 1),
			order("o-2", OrderStatus::Pending, 10, 2),
			order("o-3", OrderStatus::Delivered, 10, 3),
			order("o-4", OrderStatus::Cancelled, 10, 4),
		];

		let report = dashboard(&orders, 0, fixed_now());
		assert_eq!(report.status_breakdown.pending, 2);
		assert_eq!(report.status_breakdown.delivered, 1);
		assert_eq!(report.status_breakdown.cancelled, 1);
		assert_eq!(report.status_breakdown.accepted, 0);
	}

	#[test]
	fn test_top_products_aggregate_by_name_snapshot() {
		let mut o1 = order("o-1", OrderStatus::Delivered, 100, 1);
		o1.items = vec![item("Classic Burger", 30, 2), item("Fries", 15, 1)];
		let mut o2 = order("o-2", OrderStatus::Delivered, 100, 2);
		o2.items = vec![item("Classic Burger", 30, 1)];
		let mut o3 = order("o-3", OrderStatus::Cancelled, 100, 3);
		o3.items = vec![item("Fries", 15, 50)];

		let report = dashboard(&[o1, o2, o3], 0, fixed_now());
		assert_eq!(report.top_products.len(), 2);

		let burger = &report.top_products[0];
		assert_eq!(burger.name, "Classic Burger");
		assert_eq!(burger.quantity, 3);
		assert_eq!(burger.revenue, Decimal::from(90));

		// The cancelled order's fifty portions of fries never count
		let fries = &report.top_products[1];
		assert_eq!(fries.quantity, 1);
	}

	#[test]
	fn test_top_products_truncated_to_five() {
		let mut o = order("o-1", OrderStatus::Delivered, 100, 1);
		o.items = (0..8u32)
			.map(|i| item(&format!("Item {}", i), 10, i + 1))
			.collect();

		let report = dashboard(&[o], 0, fixed_now());
		assert_eq!(report.top_products.len(), 5);
		// Sorted by units sold, descending
		assert_eq!(report.top_products[0].name, "Item 7");
		assert_eq!(report.top_products[0].quantity, 8);
	}

	#[test]
	fn test_empty_snapshot_produces_zeroed_report() {
		let report = dashboard(&[], 0, fixed_now());

		assert_eq!(report.total_revenue, Decimal::ZERO);
		assert_eq!(report.total_orders, 0);
		assert_eq!(report.average_ticket, Decimal::ZERO);
		assert_eq!(report.today_orders, 0);
		assert!(report.top_products.is_empty());
	}
}
