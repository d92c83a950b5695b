//! Catalog endpoints: product and category CRUD for the admin dashboard.
//!
//! Deleting or renaming catalog entries never touches historical orders;
//! order lines carry their own snapshots.

use super::map_storage_error;
use crate::server::AppState;
use comanda_types::{
	ApiError, Category, CategoryPayload, Collection, Product, ProductPayload,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn validate_product(payload: &ProductPayload) -> Result<(), ApiError> {
	if payload.name.trim().is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "MISSING_NAME".to_string(),
			message: "Product name cannot be empty".to_string(),
			details: None,
		});
	}
	if payload.base_price < Decimal::ZERO {
		return Err(ApiError::BadRequest {
			error_type: "INVALID_PRICE".to_string(),
			message: "Product price cannot be negative".to_string(),
			details: None,
		});
	}
	Ok(())
}

fn validate_category(payload: &CategoryPayload) -> Result<(), ApiError> {
	if payload.name.trim().is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "MISSING_NAME".to_string(),
			message: "Category name cannot be empty".to_string(),
			details: None,
		});
	}
	Ok(())
}

fn product_from_payload(id: String, payload: ProductPayload) -> Product {
	Product {
		id,
		category_id: payload.category_id,
		name: payload.name,
		description: payload.description,
		base_price: payload.base_price,
		image_url: payload.image_url,
		is_active: payload.is_active,
		tags: payload.tags,
	}
}

/// Lists all products, active or not, sorted by name.
pub async fn list_products(state: &AppState) -> Result<Vec<Product>, ApiError> {
	let mut products: Vec<Product> = state
		.storage
		.retrieve_all(Collection::Products.as_str())
		.await
		.map_err(map_storage_error)?;
	products.sort_by(|a, b| a.name.cmp(&b.name));
	Ok(products)
}

/// Creates a product.
pub async fn create_product(
	state: &AppState,
	payload: ProductPayload,
) -> Result<Product, ApiError> {
	validate_product(&payload)?;

	let product = product_from_payload(Uuid::new_v4().to_string(), payload);
	state
		.storage
		.store(Collection::Products.as_str(), &product.id, &product)
		.await
		.map_err(map_storage_error)?;

	Ok(product)
}

/// Replaces an existing product.
pub async fn update_product(
	state: &AppState,
	product_id: &str,
	payload: ProductPayload,
) -> Result<Product, ApiError> {
	validate_product(&payload)?;

	let product = product_from_payload(product_id.to_string(), payload);
	state
		.storage
		.update(Collection::Products.as_str(), product_id, &product)
		.await
		.map_err(map_storage_error)?;

	Ok(product)
}

/// Deletes a product. Historical order lines keep their snapshots.
pub async fn delete_product(state: &AppState, product_id: &str) -> Result<(), ApiError> {
	state
		.storage
		.remove(Collection::Products.as_str(), product_id)
		.await
		.map_err(map_storage_error)
}

/// Lists all categories sorted by display order.
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>, ApiError> {
	let mut categories: Vec<Category> = state
		.storage
		.retrieve_all(Collection::Categories.as_str())
		.await
		.map_err(map_storage_error)?;
	categories.sort_by_key(|c| c.display_order);
	Ok(categories)
}

/// Creates a category.
pub async fn create_category(
	state: &AppState,
	payload: CategoryPayload,
) -> Result<Category, ApiError> {
	validate_category(&payload)?;

	let category = Category {
		id: Uuid::new_v4().to_string(),
		name: payload.name,
		display_order: payload.display_order,
		is_active: payload.is_active,
	};
	state
		.storage
		.store(Collection::Categories.as_str(), &category.id, &category)
		.await
		.map_err(map_storage_error)?;

	Ok(category)
}

/// Replaces an existing category.
pub async fn update_category(
	state: &AppState,
	category_id: &str,
	payload: CategoryPayload,
) -> Result<Category, ApiError> {
	validate_category(&payload)?;

	let category = Category {
		id: category_id.to_string(),
		name: payload.name,
		display_order: payload.display_order,
		is_active: payload.is_active,
	};
	state
		.storage
		.update(Collection::Categories.as_str(), category_id, &category)
		.await
		.map_err(map_storage_error)?;

	Ok(category)
}

/// Deletes a category. Products pointing at it simply stop appearing on the
/// menu until they are re-homed.
pub async fn delete_category(state: &AppState, category_id: &str) -> Result<(), ApiError> {
	state
		.storage
		.remove(Collection::Categories.as_str(), category_id)
		.await
		.map_err(map_storage_error)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apis::testing::test_state;

	fn payload(name: &str, price: i64) -> ProductPayload {
		ProductPayload {
			category_id: "cat-1".to_string(),
			name: name.to_string(),
			description: "A product".to_string(),
			base_price: Decimal::from(price),
			image_url: None,
			is_active: true,
			tags: vec!["new".to_string()],
		}
	}

	#[tokio::test]
	async fn test_product_crud_roundtrip() {
		let state = test_state();

		let created = create_product(&state, payload("Classic Burger", 30))
			.await
			.unwrap();
		assert_eq!(created.name, "Classic Burger");

		let mut updated_payload = payload("Classic Burger", 32);
		updated_payload.is_active = false;
		let updated = update_product(&state, &created.id, updated_payload)
			.await
			.unwrap();
		assert_eq!(updated.base_price, Decimal::from(32));
		assert!(!updated.is_active);

		let listed = list_products(&state).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].base_price, Decimal::from(32));

		delete_product(&state, &created.id).await.unwrap();
		assert!(list_products(&state).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_missing_product_is_not_found() {
		let state = test_state();
		let result = update_product(&state, "ghost", payload("Burger", 30)).await;
		assert!(matches!(result, Err(ApiError::NotFound { .. })));
	}

	#[tokio::test]
	async fn test_create_product_rejects_blank_name() {
		let state = test_state();
		let result = create_product(&state, payload("   ", 30)).await;
		assert!(matches!(result, Err(ApiError::BadRequest { .. })));
	}

	#[tokio::test]
	async fn test_create_product_rejects_negative_price() {
		let state = test_state();
		let result = create_product(&state, payload("Burger", -1)).await;
		assert!(matches!(result, Err(ApiError::BadRequest { .. })));
	}

	#[tokio::test]
	async fn test_categories_listed_by_display_order() {
		let state = test_state();
		for (name, position) in [("Drinks", 3), ("Burgers", 1), ("Sides", 2)] {
			create_category(
				&state,
				CategoryPayload {
					name: name.to_string(),
					display_order: position,
					is_active: true,
				},
			)
			.await
			.unwrap();
		}

		let listed = list_categories(&state).await.unwrap();
		let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["Burgers", "Sides", "Drinks"]);
	}
}
