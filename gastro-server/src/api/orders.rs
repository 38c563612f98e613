use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderCreate, OrderListQuery};

use crate::db::{Row, orders};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{DATETIME_FORMAT, parse_id, require, validate_date, validate_positive_id};

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create))
        .route("/api/orders/{order_id}/details", get(details))
}

/// Newest first, optionally restricted to one day
async fn list(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> ServiceResult<Json<Vec<Row>>> {
    let Query(query) = query.map_err(|r| AppError::invalid_request(r.body_text()))?;
    let date = query.date.filter(|d| !d.trim().is_empty());
    if let Some(date) = &date {
        validate_date(date, "date")?;
    }
    Ok(Json(orders::list_orders(&state.gateway, date.as_deref()).await?))
}

async fn details(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ServiceResult<Json<Vec<Row>>> {
    let order_id = parse_id(&order_id, "order_id")?;
    let rows = orders::list_details(&state.gateway, order_id).await?;
    if rows.is_empty() && !orders::order_exists(&state.gateway, order_id).await? {
        return Err(AppError::new(ErrorCode::OrderNotFound)
            .with_detail("order_id", order_id)
            .into());
    }
    Ok(Json(rows))
}

/// Order time is stamped with the server's local clock
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    let data = json_body(payload)?;
    let session_id = validate_positive_id(require(data.session_id, "session_id")?, "session_id")?;
    let staff_id = validate_positive_id(require(data.staff_id, "staff_id")?, "staff_id")?;

    let order_time = chrono::Local::now().format(DATETIME_FORMAT).to_string();
    let order_id = orders::create_order(&state.gateway, session_id, staff_id, &order_time).await?;
    tracing::info!(order_id, session_id, staff_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order_id": order_id,
            "order_time": order_time,
        })),
    ))
}
