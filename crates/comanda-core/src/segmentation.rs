//! RFV customer segmentation engine.
//!
//! Classifies every registered customer by recency, frequency, and value
//! over a snapshot of the order history. The computation is a single pass,
//! deterministic, and independent of input order; "now" is an explicit
//! parameter so results are reproducible.

use crate::lifecycle;
use chrono::{DateTime, Utc};
use comanda_types::{Customer, CustomerProfile, Order, Segment, SegmentCounts, SegmentReport};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Recency sentinel for customers with no qualifying order.
///
/// Large enough to sort after any real recency value and to land in the
/// lead/lost buckets of the classification rules.
pub const NEVER_ORDERED_DAYS: i64 = 999;

/// Per-customer accumulator filled during the order pass.
#[derive(Default)]
struct Accumulator {
	total_orders: u32,
	total_spent: Decimal,
	last_order_at: Option<DateTime<Utc>>,
}

/// Computes the segmentation report for a customer/order snapshot.
///
/// Cancelled orders contribute nothing to frequency or value, per the
/// revenue inclusion rule; a customer whose orders were all cancelled ends
/// up as a lead. Orders referencing unknown customers are silently skipped.
/// The ranked table retains only customers with at least one qualifying
/// order, while segment counts cover the full classified set.
pub fn segment_customers(
	customers: &[Customer],
	orders: &[Order],
	now: DateTime<Utc>,
) -> SegmentReport {
	let index: HashMap<&str, usize> = customers
		.iter()
		.enumerate()
		.map(|(i, c)| (c.id.as_str(), i))
		.collect();
	let mut accumulators: Vec<Accumulator> =
		customers.iter().map(|_| Accumulator::default()).collect();

	for order in orders {
		if !lifecycle::counts_toward_revenue(order.status) {
			continue;
		}
		// Orders pointing at deleted or unknown customers contribute nothing
		let Some(&i) = index.get(order.customer_id.as_str()) else {
			continue;
		};

		let acc = &mut accumulators[i];
		acc.total_orders += 1;
		acc.total_spent += order.total;
		if acc
			.last_order_at
			.is_none_or(|current| order.created_at > current)
		{
			acc.last_order_at = Some(order.created_at);
		}
	}

	let mut segment_counts = SegmentCounts::default();
	let mut ranked = Vec::new();

	for (customer, acc) in customers.iter().zip(accumulators) {
		let days_since_last_order = acc
			.last_order_at
			.map_or(NEVER_ORDERED_DAYS, |last| days_since(now, last));
		let segment = classify(acc.total_orders, days_since_last_order);
		segment_counts.record(segment);

		// Leads are classified but kept out of the ranked table
		if acc.total_orders == 0 {
			continue;
		}
		ranked.push(CustomerProfile {
			id: customer.id.clone(),
			name: customer.name.clone(),
			phone: customer.phone.clone(),
			email: customer.email.clone(),
			total_orders: acc.total_orders,
			total_spent: acc.total_spent,
			last_order_at: acc.last_order_at,
			days_since_last_order,
			segment,
		});
	}

	// Stable sort: ties keep input order
	ranked.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));

	let total_customers = ranked.len();
	let average_ltv = if total_customers == 0 {
		Decimal::ZERO
	} else {
		ranked.iter().map(|c| c.total_spent).sum::<Decimal>()
			/ Decimal::from(total_customers as u64)
	};

	SegmentReport {
		total_customers,
		average_ltv,
		segment_counts,
		customers: ranked,
	}
}

/// Whole days elapsed between `now` and `last`, rounded up.
///
/// Any positive elapsed time counts as at least one day.
fn days_since(now: DateTime<Utc>, last: DateTime<Utc>) -> i64 {
	let millis = now.signed_duration_since(last).num_milliseconds().abs();
	(millis as u64).div_ceil(86_400_000) as i64
}

/// Ordered, first-match segment classification.
///
/// Rule order is load-bearing: a customer matching several rules takes the
/// earliest one. The apparent gaps at boundary values (e.g. a single order
/// between 16 and 30 days ago falls through to `Lost`) are intentional and
/// must not be smoothed over.
fn classify(total_orders: u32, days_since_last_order: i64) -> Segment {
	if total_orders == 0 {
		Segment::New // lead, never purchased
	} else if total_orders >= 5 && days_since_last_order <= 30 {
		Segment::Champion
	} else if total_orders >= 2 && days_since_last_order <= 45 {
		Segment::Loyal
	} else if days_since_last_order <= 15 && total_orders == 1 {
		Segment::New // recent first-time buyer
	} else if days_since_last_order > 30 && days_since_last_order <= 90 {
		Segment::AtRisk
	} else {
		Segment::Lost
	}
}
