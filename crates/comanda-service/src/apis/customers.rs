//! Customer endpoints: phone lookup-or-create and listing.
//!
//! The ordering flow identifies customers by phone number: a known phone
//! returns the existing record, an unknown one registers a new customer on
//! the spot.

use super::map_storage_error;
use crate::server::AppState;
use chrono::Utc;
use comanda_types::{ApiError, Collection, Customer, LookupCustomerRequest};
use uuid::Uuid;

/// Finds a customer by phone, creating one when absent.
pub async fn lookup_customer(
	state: &AppState,
	request: LookupCustomerRequest,
) -> Result<Customer, ApiError> {
	let phone = request.phone.trim();
	if phone.is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "MISSING_PHONE".to_string(),
			message: "A phone number is required".to_string(),
			details: None,
		});
	}

	let customers: Vec<Customer> = state
		.storage
		.retrieve_all(Collection::Customers.as_str())
		.await
		.map_err(map_storage_error)?;

	if let Some(existing) = customers.into_iter().find(|c| c.phone == phone) {
		return Ok(existing);
	}

	let name = request.name.trim();
	if name.is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "MISSING_NAME".to_string(),
			message: "A name is required to register a new customer".to_string(),
			details: None,
		});
	}

	let customer = Customer {
		id: Uuid::new_v4().to_string(),
		name: name.to_string(),
		phone: phone.to_string(),
		email: None,
		created_at: Utc::now(),
	};

	state
		.storage
		.store(Collection::Customers.as_str(), &customer.id, &customer)
		.await
		.map_err(map_storage_error)?;

	tracing::info!(customer_id = %customer.id, "Registered new customer");
	Ok(customer)
}

/// Lists all registered customers sorted by name.
pub async fn list_customers(state: &AppState) -> Result<Vec<Customer>, ApiError> {
	let mut customers: Vec<Customer> = state
		.storage
		.retrieve_all(Collection::Customers.as_str())
		.await
		.map_err(map_storage_error)?;
	customers.sort_by(|a, b| a.name.cmp(&b.name));
	Ok(customers)
}
