//! Customer Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Create customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub vip_status: bool,
    /// Lifetime value carried over from another system; defaults to zero
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_ltv: Option<Decimal>,
}

/// Result of a successful cascade delete, returned by `DELETE /api/customers/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDeleted {
    pub customer_id: i64,
    pub message: String,
    /// Rows removed per table, keyed by table name
    pub removed: std::collections::BTreeMap<String, u64>,
}
