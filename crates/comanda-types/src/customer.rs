//! Customer types for the comanda platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered customer.
///
/// Customers are created on first interaction (phone lookup-or-create in the
/// ordering flow) and are never deleted. Contact attributes are mutable and
/// not otherwise validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
	/// Unique identifier, immutable.
	pub id: String,
	pub name: String,
	pub phone: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Timestamp of first registration.
	pub created_at: DateTime<Utc>,
}
