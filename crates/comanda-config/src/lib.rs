//! Configuration module for the comanda platform.
//!
//! This module provides structures and utilities for managing platform
//! configuration. It supports loading configuration from TOML files with
//! environment variable resolution and provides validation to ensure all
//! required configuration values are properly set.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the comanda platform.
///
/// This structure contains all configuration sections required for the
/// service to operate: the restaurant profile, the storage backend, and the
/// HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Restaurant profile driving checkout rules and menu metadata.
	pub restaurant: RestaurantConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Restaurant profile configuration.
///
/// These values feed the checkout rules directly: a closed restaurant
/// rejects new orders, the delivery fee is added to delivery orders, and
/// drafts below the minimum order value are rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestaurantConfig {
	/// Display name of the restaurant.
	pub name: String,
	/// Whether the restaurant is currently taking orders.
	#[serde(default = "default_is_open")]
	pub is_open: bool,
	/// Flat delivery fee applied to delivery orders.
	#[serde(default = "default_decimal_zero")]
	pub delivery_fee: Decimal,
	/// Minimum order subtotal accepted at checkout.
	#[serde(default = "default_decimal_zero")]
	pub min_order_value: Decimal,
	/// Average preparation time shown to customers.
	#[serde(default = "default_prep_time_minutes")]
	pub prep_time_minutes: u64,
}

fn default_is_open() -> bool {
	true
}

fn default_decimal_zero() -> Decimal {
	Decimal::ZERO
}

/// Returns the default average preparation time in minutes.
fn default_prep_time_minutes() -> u64 {
	30
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default API host.
///
/// This provides a default host address of 127.0.0.1 (localhost) for the API
/// server when no explicit host is configured.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
///
/// This provides a default port of 3000 for the API server
/// when no explicit port is configured.
fn default_api_port() -> u16 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			}
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variable references in the file are resolved before
	/// parsing, and the resulting configuration is validated.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		Self::from_toml_str(&raw)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let resolved = resolve_env_vars(raw)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method performs validation across all configuration sections:
	/// - Ensures the restaurant name is not empty
	/// - Checks that monetary values are not negative
	/// - Validates that the primary storage backend is configured
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate restaurant config
		if self.restaurant.name.is_empty() {
			return Err(ConfigError::Validation(
				"Restaurant name cannot be empty".into(),
			));
		}
		if self.restaurant.delivery_fee < Decimal::ZERO {
			return Err(ConfigError::Validation(
				"Delivery fee cannot be negative".into(),
			));
		}
		if self.restaurant.min_order_value < Decimal::ZERO {
			return Err(ConfigError::Validation(
				"Minimum order value cannot be negative".into(),
			));
		}

		// Validate storage config
		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		Ok(())
	}
}
