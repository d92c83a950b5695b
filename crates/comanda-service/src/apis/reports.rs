//! Reporting endpoints: the CRM segmentation view and the dashboard KPIs.
//!
//! Both endpoints fetch full snapshots and hand them to the pure
//! computations in `comanda-core` with the current wall-clock time as the
//! injected "now".

use super::map_storage_error;
use crate::server::AppState;
use chrono::Utc;
use comanda_core::{reporting, segmentation};
use comanda_types::{ApiError, Collection, Customer, DashboardReport, Order, SegmentReport};

/// Computes the RFV segmentation report over the full customer and order
/// history.
pub async fn get_segments(state: &AppState) -> Result<SegmentReport, ApiError> {
	let mut customers: Vec<Customer> = state
		.storage
		.retrieve_all(Collection::Customers.as_str())
		.await
		.map_err(map_storage_error)?;
	// Storage listing order is arbitrary; registration order keeps ranking
	// ties deterministic across calls
	customers.sort_by(|a, b| a.created_at.cmp(&b.created_at));

	let orders: Vec<Order> = state
		.storage
		.retrieve_all(Collection::Orders.as_str())
		.await
		.map_err(map_storage_error)?;

	Ok(segmentation::segment_customers(
		&customers,
		&orders,
		Utc::now(),
	))
}

/// Computes the dashboard KPIs over the full order history.
pub async fn get_dashboard(state: &AppState) -> Result<DashboardReport, ApiError> {
	let orders: Vec<Order> = state
		.storage
		.retrieve_all(Collection::Orders.as_str())
		.await
		.map_err(map_storage_error)?;

	let customers: Vec<Customer> = state
		.storage
		.retrieve_all(Collection::Customers.as_str())
		.await
		.map_err(map_storage_error)?;

	Ok(reporting::dashboard(&orders, customers.len(), Utc::now()))
}
