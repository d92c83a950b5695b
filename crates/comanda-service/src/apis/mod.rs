//! Endpoint implementations for the comanda API.
//!
//! Each module implements one area of the API surface; the thin axum
//! handlers in `server` delegate here. Shared error mapping lives at this
//! level so every endpoint surfaces storage and lifecycle failures the same
//! way.

pub mod catalog;
pub mod customers;
pub mod menu;
pub mod orders;
pub mod reports;

use comanda_core::OrderStateError;
use comanda_storage::StorageError;
use comanda_types::ApiError;

/// Maps storage failures onto the API error envelope.
///
/// Backend outages are retryable; a record that no longer deserializes is
/// not, so it surfaces as an internal error instead.
pub(crate) fn map_storage_error(err: StorageError) -> ApiError {
	match err {
		StorageError::NotFound => ApiError::NotFound {
			error_type: "NOT_FOUND".to_string(),
			message: "Resource not found".to_string(),
		},
		StorageError::Serialization(message) => ApiError::InternalServerError {
			error_type: "CORRUPT_RECORD".to_string(),
			message,
		},
		other => ApiError::ServiceUnavailable {
			error_type: "STORAGE_UNAVAILABLE".to_string(),
			message: other.to_string(),
			retry_after: Some(5),
		},
	}
}

/// Maps order state machine failures onto the API error envelope.
///
/// Illegal transitions are conflicts with the order's current state, not
/// validation errors.
pub(crate) fn map_state_error(err: OrderStateError) -> ApiError {
	match err {
		OrderStateError::OrderNotFound(id) => ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("Order not found: {}", id),
		},
		OrderStateError::NoTransition(status) => ApiError::Conflict {
			error_type: "NO_TRANSITION".to_string(),
			message: format!("No transition available from {}", status),
		},
		OrderStateError::InvalidTransition { from, to } => ApiError::Conflict {
			error_type: "INVALID_TRANSITION".to_string(),
			message: format!("Cannot move order from {} to {}", from, to),
		},
		OrderStateError::Storage(message) => ApiError::ServiceUnavailable {
			error_type: "STORAGE_UNAVAILABLE".to_string(),
			message,
			retry_after: Some(5),
		},
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use crate::server::AppState;
	use comanda_config::Config;
	use comanda_core::{EventBus, OrderStateMachine};
	use comanda_storage::implementations::memory::MemoryStorage;
	use comanda_storage::StorageService;
	use std::sync::Arc;

	const OPEN_RESTAURANT: &str = r#"
[restaurant]
name = "Test Kitchen"
delivery_fee = "5.00"
min_order_value = "20.00"

[storage]
primary = "memory"

[storage.implementations.memory]
"#;

	/// Builds an AppState over fresh in-memory storage.
	pub(crate) fn test_state() -> AppState {
		state_from_config(OPEN_RESTAURANT)
	}

	/// Same as `test_state`, with the restaurant closed.
	pub(crate) fn closed_state() -> AppState {
		let raw = format!("{}\n", OPEN_RESTAURANT).replace(
			"name = \"Test Kitchen\"",
			"name = \"Test Kitchen\"\nis_open = false",
		);
		state_from_config(&raw)
	}

	fn state_from_config(raw: &str) -> AppState {
		let config = Config::from_toml_str(raw).unwrap();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let event_bus = EventBus::new(64);
		let state_machine = Arc::new(OrderStateMachine::new(Arc::clone(&storage), event_bus));
		AppState {
			config,
			storage,
			state_machine,
		}
	}
}
