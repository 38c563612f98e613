//! Order statements

use super::gateway::{Gateway, GatewayError, Row, SqlParam};

/// Orders with customer name and line count, newest first.
/// `date` filters on the calendar day of `order_time` (`YYYY-MM-DD`).
pub async fn list_orders(gw: &Gateway, date: Option<&str>) -> Result<Vec<Row>, GatewayError> {
    let mut statement = String::from(
        r#"
        SELECT o.order_id, ds.session_id, c.full_name AS customer_name,
               o.order_time, COUNT(od.detail_id) AS item_count
        FROM orders o
        JOIN dining_sessions ds ON o.session_id = ds.session_id
        JOIN reservations r ON ds.reservation_id = r.reservation_id
        JOIN customers c ON r.customer_id = c.customer_id
        LEFT JOIN order_details od ON o.order_id = od.order_id
        "#,
    );
    let mut params = Vec::new();
    if let Some(date) = date {
        statement.push_str(" WHERE DATE(o.order_time) = ?");
        params.push(SqlParam::from(date));
    }
    statement.push_str(" GROUP BY o.order_id ORDER BY o.order_time DESC");

    gw.query(&statement, &params).await
}

pub async fn list_details(gw: &Gateway, order_id: i64) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT od.detail_id, m.name AS item_name, od.quantity, m.price,
               (od.quantity * m.price) AS total_price, od.special_note
        FROM order_details od
        JOIN menu_items m ON od.item_id = m.item_id
        WHERE od.order_id = ?
        ORDER BY od.detail_id
        "#,
        &[SqlParam::Int(order_id)],
    )
    .await
}

pub async fn create_order(
    gw: &Gateway,
    session_id: i64,
    staff_id: i64,
    order_time: &str,
) -> Result<i64, GatewayError> {
    gw.insert(
        "INSERT INTO orders (session_id, staff_id, order_time) VALUES (?, ?, ?)",
        &[
            SqlParam::Int(session_id),
            SqlParam::Int(staff_id),
            order_time.into(),
        ],
    )
    .await
}

pub async fn order_exists(gw: &Gateway, order_id: i64) -> Result<bool, GatewayError> {
    let rows = gw
        .query(
            "SELECT order_id FROM orders WHERE order_id = ?",
            &[SqlParam::Int(order_id)],
        )
        .await?;
    Ok(!rows.is_empty())
}
