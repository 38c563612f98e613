//! Menu reads

use super::gateway::{Gateway, GatewayError, Row, SqlParam};

/// Column labels are the ones the dashboard binds to
pub async fn list_menu(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT m.item_id,
               COALESCE(m.name, 'Unknown Item') AS Yemek,
               COALESCE(m.price, 0.0) AS Fiyat,
               COALESCE(c.category_name, 'Uncategorized') AS Kategori,
               COALESCE(m.prep_time_minutes, 0) AS Hazirlanma
        FROM menu_items m
        LEFT JOIN categories c ON m.category_id = c.category_id
        ORDER BY m.price DESC
        "#,
        &[],
    )
    .await
}

pub async fn list_by_category(gw: &Gateway, category_id: i64) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT m.item_id,
               COALESCE(m.name, 'Unknown Item') AS name,
               COALESCE(m.price, 0.0) AS price,
               COALESCE(c.category_name, 'Uncategorized') AS category_name
        FROM menu_items m
        LEFT JOIN categories c ON m.category_id = c.category_id
        WHERE m.category_id = ?
        ORDER BY m.price ASC
        "#,
        &[SqlParam::Int(category_id)],
    )
    .await
}

pub async fn list_categories(gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
    gw.query(
        r#"
        SELECT category_id,
               COALESCE(category_name, 'Uncategorized') AS category_name,
               COALESCE(target_margin, 0.0) AS target_margin
        FROM categories
        ORDER BY category_id
        "#,
        &[],
    )
    .await
}

pub async fn category_exists(gw: &Gateway, category_id: i64) -> Result<bool, GatewayError> {
    let rows = gw
        .query(
            "SELECT category_id FROM categories WHERE category_id = ?",
            &[SqlParam::Int(category_id)],
        )
        .await?;
    Ok(!rows.is_empty())
}
