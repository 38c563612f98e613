//! Reservation statements

use shared::models::ReservationStatus;

use super::gateway::{Gateway, GatewayError, Row, SqlParam};

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_id: i64,
    pub table_id: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub reservation_time: String,
    pub party_size: i64,
}

pub async fn list_reservations(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT r.reservation_id,
               COALESCE(c.full_name, 'Unknown') AS customer_name,
               r.table_id,
               r.reservation_time,
               COALESCE(r.party_size, 1) AS party_size,
               COALESCE(r.status, 'Pending') AS status
        FROM reservations r
        LEFT JOIN customers c ON r.customer_id = c.customer_id
        ORDER BY r.reservation_time DESC
        "#,
        &[],
    )
    .await
}

/// Reservations in one status, soonest first
pub async fn list_by_status(
    gw: &Gateway,
    status: ReservationStatus,
) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT r.reservation_id,
               COALESCE(c.full_name, 'Unknown') AS full_name,
               r.table_id,
               r.reservation_time,
               COALESCE(r.party_size, 1) AS party_size
        FROM reservations r
        LEFT JOIN customers c ON r.customer_id = c.customer_id
        WHERE r.status = ?
        ORDER BY r.reservation_time ASC
        "#,
        &[status.as_str().into()],
    )
    .await
}

pub async fn create_reservation(gw: &Gateway, data: &NewReservation) -> Result<i64, GatewayError> {
    gw.insert(
        r#"
        INSERT INTO reservations (customer_id, table_id, reservation_time, party_size, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
        &[
            SqlParam::Int(data.customer_id),
            SqlParam::Int(data.table_id),
            data.reservation_time.as_str().into(),
            SqlParam::Int(data.party_size),
            ReservationStatus::Pending.as_str().into(),
        ],
    )
    .await
}

/// Returns the affected row count; 0 means no such reservation
pub async fn update_status(
    gw: &Gateway,
    reservation_id: i64,
    status: ReservationStatus,
) -> Result<u64, GatewayError> {
    gw.execute(
        "UPDATE reservations SET status = ? WHERE reservation_id = ?",
        &[status.as_str().into(), SqlParam::Int(reservation_id)],
    )
    .await
}
