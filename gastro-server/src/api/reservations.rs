use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{ReservationCreate, ReservationStatus, ReservationStatusUpdate};

use crate::db::Row;
use crate::db::reservations::{self, NewReservation};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{normalize_datetime, parse_id, require, validate_positive_id};

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reservations", get(list).post(create))
        .route("/api/reservations/pending", get(list_pending))
        .route("/api/reservations/confirmed", get(list_confirmed))
        .route("/api/reservations/{reservation_id}", put(update_status))
}

/// Newest first, with customer name
async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(reservations::list_reservations(&state.gateway).await?))
}

async fn list_pending(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(
        reservations::list_by_status(&state.gateway, ReservationStatus::Pending).await?,
    ))
}

async fn list_confirmed(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(
        reservations::list_by_status(&state.gateway, ReservationStatus::Confirmed).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ReservationCreate>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    let data = json_body(payload)?;

    let customer_id = validate_positive_id(require(data.customer_id, "customer_id")?, "customer_id")?;
    let table_id = validate_positive_id(require(data.table_id, "table_id")?, "table_id")?;
    let reservation_time = require(data.reservation_time, "reservation_time")?;
    let party_size = require(data.party_size, "party_size")?;

    if party_size < 1 {
        return Err(AppError::new(ErrorCode::InvalidPartySize)
            .with_detail("field", "party_size")
            .with_detail("value", party_size)
            .into());
    }

    let reservation = NewReservation {
        customer_id,
        table_id,
        reservation_time: normalize_datetime(&reservation_time, "reservation_time")?,
        party_size,
    };
    let reservation_id = reservations::create_reservation(&state.gateway, &reservation).await?;
    tracing::info!(reservation_id, customer_id, table_id, "Reservation created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Reservation created successfully",
            "reservation_id": reservation_id,
        })),
    ))
}

async fn update_status(
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
    payload: Result<Json<ReservationStatusUpdate>, JsonRejection>,
) -> ServiceResult<Json<Value>> {
    let reservation_id = parse_id(&reservation_id, "reservation_id")?;
    let data = json_body(payload)?;

    let status: ReservationStatus = require(data.status, "status")?.parse().map_err(|msg: String| {
        AppError::with_message(ErrorCode::InvalidReservationStatus, msg)
            .with_detail("field", "status")
    })?;

    let affected = reservations::update_status(&state.gateway, reservation_id, status).await?;
    if affected == 0 {
        return Err(AppError::new(ErrorCode::ReservationNotFound)
            .with_detail("reservation_id", reservation_id)
            .into());
    }
    tracing::info!(reservation_id, status = %status, "Reservation status updated");

    Ok(Json(json!({
        "message": "Reservation updated successfully",
        "reservation_id": reservation_id,
        "status": status,
    })))
}
