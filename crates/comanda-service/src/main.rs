//! Main entry point for the comanda service.
//!
//! This binary serves the restaurant ordering platform: the customer-facing
//! checkout and tracking flow and the admin order board, catalog, and
//! reporting endpoints, all over one HTTP API backed by pluggable storage.

use clap::Parser;
use comanda_config::Config;
use comanda_core::{EventBus, OrderStateMachine};
use comanda_storage::{StorageFactory, StorageService};
use comanda_types::OrderEvent;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

mod apis;
mod server;

/// Command-line arguments for the comanda service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the comanda service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Wires storage, the state machine, and the event bus
/// 5. Runs the API server and the order feed until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started comanda service");

	// Load configuration
	let config = Config::from_file(args.config.to_str().ok_or("Invalid config path")?).await?;
	tracing::info!("Loaded configuration [{}]", config.restaurant.name);

	// Wire storage and the order state machine
	let storage = Arc::new(build_storage(&config)?);
	let event_bus = EventBus::new(1000);
	let state_machine = Arc::new(OrderStateMachine::new(
		Arc::clone(&storage),
		event_bus.clone(),
	));

	let app_state = server::AppState {
		config: config.clone(),
		storage,
		state_machine,
	};

	// Check if API server should be started
	let api_enabled = config.api.as_ref().is_some_and(|api| api.enabled);

	let feed_task = run_order_feed(event_bus);

	if api_enabled {
		let api_config = config.api.as_ref().ok_or("Missing API configuration")?.clone();

		// Run the API server and the order feed concurrently
		tokio::select! {
			result = server::start_server(api_config, app_state) => {
				tracing::info!("API server finished");
				result?;
			}
			_ = feed_task => {
				tracing::info!("Order feed finished");
			}
			_ = tokio::signal::ctrl_c() => {}
		}
	} else {
		// Run only the order feed
		tracing::info!("API server disabled; running order feed only");
		tokio::select! {
			_ = feed_task => {}
			_ = tokio::signal::ctrl_c() => {}
		}
	}

	tracing::info!("Stopped comanda service");
	Ok(())
}

/// Builds the storage service for the configured primary backend.
///
/// Implementations register themselves with the storage crate; the primary
/// name from configuration selects which factory runs.
fn build_storage(config: &Config) -> Result<StorageService, Box<dyn std::error::Error>> {
	let factories: HashMap<&'static str, StorageFactory> =
		comanda_storage::get_all_implementations().into_iter().collect();

	let factory = factories
		.get(config.storage.primary.as_str())
		.ok_or_else(|| format!("Unknown storage implementation: {}", config.storage.primary))?;

	let backend_config = config
		.storage
		.implementations
		.get(&config.storage.primary)
		.cloned()
		.unwrap_or(toml::Value::Table(toml::map::Map::new()));

	Ok(StorageService::new(factory(&backend_config)?))
}

/// Consumes the order event bus and logs the live feed.
///
/// Mirrors what the admin board and the tracking view subscribe to; lagging
/// consumers miss events and re-read on reconnect.
async fn run_order_feed(event_bus: EventBus) {
	let mut receiver = event_bus.subscribe();
	loop {
		match receiver.recv().await {
			Ok(OrderEvent::Placed { order }) => {
				tracing::info!(
					order_id = %order.id,
					total = %order.total,
					"Order placed"
				);
			}
			Ok(OrderEvent::StatusChanged { order_id, from, to }) => {
				tracing::info!(
					order_id = %order_id,
					from = %from,
					to = %to,
					"Order moved"
				);
			}
			Err(broadcast::error::RecvError::Lagged(missed)) => {
				tracing::warn!("Order feed lagged by {} events", missed);
			}
			Err(broadcast::error::RecvError::Closed) => break,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TEST_CONFIG: &str = r#"
[restaurant]
name = "Test Kitchen"

[storage]
primary = "memory"

[storage.implementations.memory]
"#;

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_build_storage_with_memory_backend() {
		let config = Config::from_toml_str(TEST_CONFIG).unwrap();
		let storage = build_storage(&config);
		assert!(storage.is_ok());
	}

	#[test]
	fn test_build_storage_rejects_unknown_backend() {
		// Validation requires primary to exist in implementations, so sneak an
		// unknown name past it with a matching section
		let raw = TEST_CONFIG
			.replace("primary = \"memory\"", "primary = \"redis\"")
			.replace("[storage.implementations.memory]", "[storage.implementations.redis]");
		let config = Config::from_toml_str(&raw).unwrap();
		let storage = build_storage(&config);
		assert!(storage.is_err());
	}
}
