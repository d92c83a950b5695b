//! Menu endpoint: the customer-facing catalog composition.
//!
//! Active categories sorted by their manual display order, each carrying its
//! active products. Inactive entries stay in the catalog but never reach the
//! menu.

use super::map_storage_error;
use crate::server::AppState;
use comanda_types::{ApiError, Category, Collection, MenuResponse, MenuSection, Product};

/// Builds the menu from the current catalog.
pub async fn get_menu(state: &AppState) -> Result<MenuResponse, ApiError> {
	let mut categories: Vec<Category> = state
		.storage
		.retrieve_all(Collection::Categories.as_str())
		.await
		.map_err(map_storage_error)?;
	categories.retain(|c| c.is_active);
	categories.sort_by_key(|c| c.display_order);

	let products: Vec<Product> = state
		.storage
		.retrieve_all(Collection::Products.as_str())
		.await
		.map_err(map_storage_error)?;

	let sections = categories
		.into_iter()
		.map(|category| {
			let mut section_products: Vec<Product> = products
				.iter()
				.filter(|p| p.is_active && p.category_id == category.id)
				.cloned()
				.collect();
			// Storage listing order is arbitrary; keep the menu stable
			section_products.sort_by(|a, b| a.name.cmp(&b.name));
			MenuSection {
				category,
				products: section_products,
			}
		})
		.collect();

	Ok(MenuResponse { sections })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apis::catalog;
	use crate::apis::testing::test_state;
	use comanda_types::{CategoryPayload, ProductPayload};
	use rust_decimal::Decimal;

	fn category(name: &str, display_order: i64, is_active: bool) -> CategoryPayload {
		CategoryPayload {
			name: name.to_string(),
			display_order,
			is_active,
		}
	}

	fn product(name: &str, category_id: &str, is_active: bool) -> ProductPayload {
		ProductPayload {
			category_id: category_id.to_string(),
			name: name.to_string(),
			description: "".to_string(),
			base_price: Decimal::from(20),
			image_url: None,
			is_active,
			tags: Vec::new(),
		}
	}

	#[tokio::test]
	async fn test_menu_orders_sections_and_hides_inactive_entries() {
		let state = test_state();

		let drinks = catalog::create_category(&state, category("Drinks", 2, true))
			.await
			.unwrap();
		let burgers = catalog::create_category(&state, category("Burgers", 1, true))
			.await
			.unwrap();
		let hidden = catalog::create_category(&state, category("Seasonal", 0, false))
			.await
			.unwrap();

		catalog::create_product(&state, product("Classic", &burgers.id, true))
			.await
			.unwrap();
		catalog::create_product(&state, product("Soda", &drinks.id, true))
			.await
			.unwrap();
		catalog::create_product(&state, product("Retired", &burgers.id, false))
			.await
			.unwrap();
		catalog::create_product(&state, product("Eggnog", &hidden.id, true))
			.await
			.unwrap();

		let menu = get_menu(&state).await.unwrap();
		let names: Vec<&str> = menu
			.sections
			.iter()
			.map(|s| s.category.name.as_str())
			.collect();
		assert_eq!(names, vec!["Burgers", "Drinks"]);

		let burger_names: Vec<&str> = menu.sections[0]
			.products
			.iter()
			.map(|p| p.name.as_str())
			.collect();
		assert_eq!(burger_names, vec!["Classic"]);
	}

	#[tokio::test]
	async fn test_empty_catalog_yields_empty_menu() {
		let state = test_state();
		let menu = get_menu(&state).await.unwrap();
		assert!(menu.sections.is_empty());
	}
}
