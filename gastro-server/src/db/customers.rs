//! Customer statements
//!
//! Customers are only ever removed through
//! [`CascadeDeleter`](super::cascade::CascadeDeleter); there is no plain
//! delete here.

use rust_decimal::Decimal;

use super::gateway::{Gateway, GatewayError, Row, SqlParam};

/// Validated insert payload
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vip_status: bool,
    pub total_ltv: Decimal,
}

// ── Reads ──

/// VIPs first, then by lifetime value
pub async fn list_customers(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT customer_id, full_name, phone, email, total_ltv, vip_status
        FROM customers
        ORDER BY vip_status DESC, total_ltv DESC
        "#,
        &[],
    )
    .await
}

pub async fn list_vip_customers(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT customer_id, full_name, phone, email, total_ltv
        FROM customers
        WHERE vip_status = 1
        ORDER BY total_ltv DESC
        "#,
        &[],
    )
    .await
}

pub async fn list_dietary_restrictions(
    gw: &Gateway,
    customer_id: i64,
) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT restriction_id, restriction_type
        FROM dietary_restrictions
        WHERE customer_id = ?
        ORDER BY restriction_id
        "#,
        &[SqlParam::Int(customer_id)],
    )
    .await
}

// ── Writes ──

pub async fn create_customer(gw: &Gateway, data: &NewCustomer) -> Result<i64, GatewayError> {
    gw.insert(
        r#"
        INSERT INTO customers (full_name, phone, email, vip_status, total_ltv)
        VALUES (?, ?, ?, ?, ?)
        "#,
        &[
            data.full_name.as_str().into(),
            data.phone.clone().into(),
            data.email.clone().into(),
            data.vip_status.into(),
            data.total_ltv.into(),
        ],
    )
    .await
}
