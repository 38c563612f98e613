//! Customer handlers
//!
//! `DELETE /api/customers/{id}` runs the cascade orchestrator and maps its
//! outcome: deleted → 200, not found → 404, failed → 500.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{CustomerCreate, CustomerDeleted};

use crate::db::customers::{self, NewCustomer};
use crate::db::{CascadeOutcome, Row};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, parse_id, require, validate_optional_text,
    validate_required_text,
};

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route("/api/customers/vip", get(list_vip))
        .route("/api/customers/dietary/{customer_id}", get(dietary_restrictions))
        .route("/api/customers/{customer_id}", axum::routing::delete(delete))
}

/// VIPs first, then by lifetime value
async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(customers::list_customers(&state.gateway).await?))
}

async fn list_vip(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    let rows = customers::list_vip_customers(&state.gateway).await?;
    if rows.is_empty() {
        return Err(AppError::new(ErrorCode::NoVipCustomers).into());
    }
    Ok(Json(rows))
}

async fn dietary_restrictions(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ServiceResult<Json<Vec<Row>>> {
    let customer_id = parse_id(&customer_id, "customer_id")?;
    Ok(Json(
        customers::list_dietary_restrictions(&state.gateway, customer_id).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CustomerCreate>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    let data = json_body(payload)?;

    let full_name = require(data.full_name, "full_name")?;
    validate_required_text(&full_name, "full_name", MAX_NAME_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.email, "email", MAX_EMAIL_LEN)?;

    let total_ltv = data.total_ltv.unwrap_or(Decimal::ZERO);
    if total_ltv < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "total_ltv must not be negative",
        )
        .with_detail("field", "total_ltv")
        .into());
    }

    let customer = NewCustomer {
        full_name: full_name.trim().to_string(),
        phone: data.phone,
        email: data.email,
        vip_status: data.vip_status,
        total_ltv,
    };
    let customer_id = customers::create_customer(&state.gateway, &customer).await?;
    tracing::info!(customer_id, vip = customer.vip_status, "Customer created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Customer created successfully",
            "customer_id": customer_id,
        })),
    ))
}

/// Remove a customer and everything that depends on it
async fn delete(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ServiceResult<Json<CustomerDeleted>> {
    let customer_id = parse_id(&customer_id, "customer_id")?;

    match state.deleter.delete_customer(customer_id).await {
        CascadeOutcome::Deleted(report) => Ok(Json(CustomerDeleted {
            customer_id,
            message: "Customer and related records deleted successfully".to_string(),
            removed: report
                .removed
                .iter()
                .map(|(table, n)| (table.to_string(), *n))
                .collect(),
        })),
        CascadeOutcome::NotFound => Err(AppError::new(ErrorCode::CustomerNotFound)
            .with_detail("customer_id", customer_id)
            .into()),
        CascadeOutcome::Failed(reason) => Err(AppError::internal("Failed to delete customer")
            .with_detail("customer_id", customer_id)
            .with_detail("reason", reason)
            .into()),
    }
}
