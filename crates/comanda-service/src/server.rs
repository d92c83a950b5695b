//! HTTP server for the comanda API.
//!
//! This module provides the HTTP server infrastructure: shared application
//! state, routing, and thin handlers that delegate to the endpoint modules
//! under `apis`.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json},
	routing::{get, post},
	Router,
};
use comanda_config::{ApiConfig, Config};
use comanda_core::OrderStateMachine;
use comanda_storage::StorageService;
use comanda_types::{
	ApiError, CategoryPayload, LookupCustomerRequest, PlaceOrderRequest, ProductPayload,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Complete configuration.
	pub config: Config,
	/// Storage service backing every collection.
	pub storage: Arc<StorageService>,
	/// Order state machine applying lifecycle rules.
	pub state_machine: Arc<OrderStateMachine>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for every endpoint.
pub async fn start_server(
	api_config: ApiConfig,
	app_state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	// Build the router with /api base path
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route(
					"/orders",
					post(handle_place_order).get(handle_list_orders),
				)
				.route("/orders/board", get(handle_get_board))
				.route("/orders/{id}", get(handle_get_order))
				.route("/orders/{id}/advance", post(handle_advance_order))
				.route("/orders/{id}/cancel", post(handle_cancel_order))
				.route("/menu", get(handle_get_menu))
				.route(
					"/products",
					get(handle_list_products).post(handle_create_product),
				)
				.route(
					"/products/{id}",
					axum::routing::put(handle_update_product).delete(handle_delete_product),
				)
				.route(
					"/categories",
					get(handle_list_categories).post(handle_create_category),
				)
				.route(
					"/categories/{id}",
					axum::routing::put(handle_update_category).delete(handle_delete_category),
				)
				.route("/customers", get(handle_list_customers))
				.route("/customers/lookup", post(handle_lookup_customer))
				.route("/reports/segments", get(handle_get_segments))
				.route("/reports/dashboard", get(handle_get_dashboard)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("comanda API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles POST /api/orders requests (checkout).
async fn handle_place_order(
	State(state): State<AppState>,
	Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::orders::place_order(&state, request).await {
		Ok(order) => Ok((StatusCode::CREATED, Json(order))),
		Err(e) => {
			tracing::warn!("Order placement failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/orders requests.
async fn handle_list_orders(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::orders::list_orders(&state).await.map(Json)
}

/// Handles GET /api/orders/board requests (kanban view).
async fn handle_get_board(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
	crate::apis::orders::get_board(&state).await.map(Json)
}

/// Handles GET /api/orders/{id} requests (tracking view).
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::orders::get_order(&state, &id).await.map(Json)
}

/// Handles POST /api/orders/{id}/advance requests.
async fn handle_advance_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::orders::advance_order(&state, &id).await {
		Ok(order) => Ok(Json(order)),
		Err(e) => {
			tracing::warn!("Order advance failed: {}", e);
			Err(e)
		}
	}
}

/// Handles POST /api/orders/{id}/cancel requests.
async fn handle_cancel_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::orders::cancel_order(&state, &id).await {
		Ok(order) => Ok(Json(order)),
		Err(e) => {
			tracing::warn!("Order cancellation failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/menu requests.
async fn handle_get_menu(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
	crate::apis::menu::get_menu(&state).await.map(Json)
}

/// Handles GET /api/products requests.
async fn handle_list_products(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::list_products(&state).await.map(Json)
}

/// Handles POST /api/products requests.
async fn handle_create_product(
	State(state): State<AppState>,
	Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::catalog::create_product(&state, payload).await {
		Ok(product) => Ok((StatusCode::CREATED, Json(product))),
		Err(e) => {
			tracing::warn!("Product creation failed: {}", e);
			Err(e)
		}
	}
}

/// Handles PUT /api/products/{id} requests.
async fn handle_update_product(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::update_product(&state, &id, payload)
		.await
		.map(Json)
}

/// Handles DELETE /api/products/{id} requests.
async fn handle_delete_product(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::delete_product(&state, &id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// Handles GET /api/categories requests.
async fn handle_list_categories(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::list_categories(&state).await.map(Json)
}

/// Handles POST /api/categories requests.
async fn handle_create_category(
	State(state): State<AppState>,
	Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::catalog::create_category(&state, payload).await {
		Ok(category) => Ok((StatusCode::CREATED, Json(category))),
		Err(e) => {
			tracing::warn!("Category creation failed: {}", e);
			Err(e)
		}
	}
}

/// Handles PUT /api/categories/{id} requests.
async fn handle_update_category(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::update_category(&state, &id, payload)
		.await
		.map(Json)
}

/// Handles DELETE /api/categories/{id} requests.
async fn handle_delete_category(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::catalog::delete_category(&state, &id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// Handles GET /api/customers requests.
async fn handle_list_customers(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::customers::list_customers(&state).await.map(Json)
}

/// Handles POST /api/customers/lookup requests.
async fn handle_lookup_customer(
	State(state): State<AppState>,
	Json(request): Json<LookupCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
	match crate::apis::customers::lookup_customer(&state, request).await {
		Ok(customer) => Ok(Json(customer)),
		Err(e) => {
			tracing::warn!("Customer lookup failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/reports/segments requests (CRM view).
async fn handle_get_segments(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::reports::get_segments(&state).await.map(Json)
}

/// Handles GET /api/reports/dashboard requests.
async fn handle_get_dashboard(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
	crate::apis::reports::get_dashboard(&state).await.map(Json)
}
