//! Feedback statements

use serde_json::Value;
use shared::models::RatingSummary;

use super::gateway::{Gateway, GatewayError, Row, SqlParam};

pub async fn list_feedback(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT f.feedback_id,
               COALESCE(c.full_name, 'Anonymous') AS full_name,
               COALESCE(f.rating, 0) AS rating,
               COALESCE(f.comment, '') AS comment,
               ds.start_time
        FROM feedback f
        LEFT JOIN dining_sessions ds ON f.session_id = ds.session_id
        LEFT JOIN reservations r ON ds.reservation_id = r.reservation_id
        LEFT JOIN customers c ON r.customer_id = c.customer_id
        ORDER BY ds.start_time DESC
        "#,
        &[],
    )
    .await
}

/// Aggregate over all feedback; an empty table yields all zeros
pub async fn rating_summary(gw: &Gateway) -> Result<RatingSummary, GatewayError> {
    let rows = gw
        .query(
            r#"
            SELECT COUNT(*) AS total_feedback,
                   CAST(COALESCE(AVG(rating), 0) AS REAL) AS avg_rating,
                   COUNT(CASE WHEN rating = 5 THEN 1 END) AS five_star,
                   COUNT(CASE WHEN rating = 4 THEN 1 END) AS four_star,
                   COUNT(CASE WHEN rating = 3 THEN 1 END) AS three_star,
                   COUNT(CASE WHEN rating <= 2 THEN 1 END) AS low_rating
            FROM feedback
            "#,
            &[],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(RatingSummary::default());
    };
    let int = |key: &str| row.get(key).and_then(Value::as_i64).unwrap_or(0);

    Ok(RatingSummary {
        total_feedback: int("total_feedback"),
        avg_rating: row
            .get("avg_rating")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        five_star: int("five_star"),
        four_star: int("four_star"),
        three_star: int("three_star"),
        low_rating: int("low_rating"),
    })
}

pub async fn session_exists(gw: &Gateway, session_id: i64) -> Result<bool, GatewayError> {
    let rows = gw
        .query(
            "SELECT session_id FROM dining_sessions WHERE session_id = ?",
            &[SqlParam::Int(session_id)],
        )
        .await?;
    Ok(!rows.is_empty())
}

pub async fn create_feedback(
    gw: &Gateway,
    session_id: i64,
    rating: i64,
    comment: &str,
) -> Result<i64, GatewayError> {
    gw.insert(
        "INSERT INTO feedback (session_id, rating, comment) VALUES (?, ?, ?)",
        &[
            SqlParam::Int(session_id),
            SqlParam::Int(rating),
            comment.into(),
        ],
    )
    .await
}
