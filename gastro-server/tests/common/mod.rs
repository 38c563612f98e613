//! Shared fixtures for integration tests: a migrated temp-file database
//! and a small restaurant data set.

#![allow(dead_code)]

use std::collections::BTreeMap;

use gastro_server::db::gateway::column_i64;
use gastro_server::db::{DbConfig, Gateway, SqlParam};
use tempfile::TempDir;

pub const ALL_TABLES: [&str; 11] = [
    "customers",
    "dietary_restrictions",
    "dining_tables",
    "reservations",
    "dining_sessions",
    "staff",
    "categories",
    "menu_items",
    "orders",
    "order_details",
    "feedback",
];

pub const DEPENDENT_TABLES: [&str; 6] = [
    "dietary_restrictions",
    "reservations",
    "dining_sessions",
    "orders",
    "order_details",
    "feedback",
];

/// Keeps the temp directory alive as long as the gateway
pub struct TestDb {
    pub gateway: Gateway,
    _dir: TempDir,
}

pub async fn setup() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("gastromind.db").display());
    let gateway = Gateway::connect(&DbConfig::new(url)).await.unwrap();
    gateway.migrate().await.unwrap();
    seed_reference_data(&gateway).await;
    TestDb {
        gateway,
        _dir: dir,
    }
}

async fn exec(gw: &Gateway, statement: &str) {
    gw.execute(statement, &[]).await.unwrap();
}

/// Tables, staff, categories and menu items
pub async fn seed_reference_data(gw: &Gateway) {
    exec(
        gw,
        "INSERT INTO dining_tables (table_id, capacity, location_zone) VALUES
            (1, 2, 'Teras'), (2, 4, 'Salon'), (3, 6, 'Bahçe')",
    )
    .await;
    exec(
        gw,
        "INSERT INTO staff (staff_id, name, role) VALUES
            (1, 'Mert Yılmaz', 'Garson'), (2, 'Zeynep Aksoy', 'Host'), (3, 'Can Öztürk', 'Şef')",
    )
    .await;
    exec(
        gw,
        "INSERT INTO categories (category_id, category_name, target_margin) VALUES
            (1, 'Ana Yemek', 0.35), (2, 'Tatlı', 0.5), (3, 'İçecek', 0.7)",
    )
    .await;
    exec(
        gw,
        "INSERT INTO menu_items (item_id, category_id, name, price, prep_time_minutes) VALUES
            (1, 1, 'Adana Kebap', 420.0, 25),
            (2, 1, 'Mantı', 310.0, 20),
            (3, 2, 'Künefe', 180.0, 15),
            (4, 3, 'Ayran', 45.0, 2)",
    )
    .await;
}

pub async fn insert_customer(gw: &Gateway, name: &str, vip: bool, ltv: f64) -> i64 {
    gw.insert(
        "INSERT INTO customers (full_name, phone, email, vip_status, total_ltv) VALUES (?, ?, ?, ?, ?)",
        &[
            name.into(),
            "+90 555 000 00 00".into(),
            SqlParam::Null,
            vip.into(),
            ltv.into(),
        ],
    )
    .await
    .unwrap()
}

pub async fn insert_reservation(gw: &Gateway, customer_id: i64, table_id: i64, time: &str) -> i64 {
    gw.insert(
        "INSERT INTO reservations (customer_id, table_id, reservation_time, party_size, status)
         VALUES (?, ?, ?, 2, 'Completed')",
        &[customer_id.into(), table_id.into(), time.into()],
    )
    .await
    .unwrap()
}

pub async fn insert_session(gw: &Gateway, reservation_id: i64, start: &str, amount: f64) -> i64 {
    gw.insert(
        "INSERT INTO dining_sessions (reservation_id, start_time, total_amount) VALUES (?, ?, ?)",
        &[reservation_id.into(), start.into(), amount.into()],
    )
    .await
    .unwrap()
}

pub async fn insert_order(gw: &Gateway, session_id: i64, staff_id: i64, time: &str) -> i64 {
    gw.insert(
        "INSERT INTO orders (session_id, staff_id, order_time) VALUES (?, ?, ?)",
        &[session_id.into(), staff_id.into(), time.into()],
    )
    .await
    .unwrap()
}

pub async fn insert_detail(gw: &Gateway, order_id: i64, item_id: i64, quantity: i64) -> i64 {
    gw.insert(
        "INSERT INTO order_details (order_id, item_id, quantity) VALUES (?, ?, ?)",
        &[order_id.into(), item_id.into(), quantity.into()],
    )
    .await
    .unwrap()
}

pub async fn insert_feedback(gw: &Gateway, session_id: i64, rating: i64, comment: &str) -> i64 {
    gw.insert(
        "INSERT INTO feedback (session_id, rating, comment) VALUES (?, ?, ?)",
        &[session_id.into(), rating.into(), comment.into()],
    )
    .await
    .unwrap()
}

pub async fn insert_restriction(gw: &Gateway, customer_id: i64, kind: &str) -> i64 {
    gw.insert(
        "INSERT INTO dietary_restrictions (customer_id, restriction_type) VALUES (?, ?)",
        &[customer_id.into(), kind.into()],
    )
    .await
    .unwrap()
}

/// Row counts the full subtree built by [`seed_full_customer`] adds
pub fn full_subtree_counts() -> BTreeMap<&'static str, i64> {
    BTreeMap::from([
        ("customers", 1),
        ("dietary_restrictions", 1),
        ("reservations", 2),
        ("dining_sessions", 2),
        ("orders", 3),
        ("order_details", 5),
        ("feedback", 2),
    ])
}

/// 2 reservations → 2 sessions → 3 orders (5 detail lines), 2 feedback,
/// 1 dietary restriction
pub async fn seed_full_customer(gw: &Gateway, name: &str) -> i64 {
    let customer = insert_customer(gw, name, true, 45_000.0).await;
    insert_restriction(gw, customer, "Glutensiz").await;

    let r1 = insert_reservation(gw, customer, 1, "2025-03-01 19:00:00").await;
    let r2 = insert_reservation(gw, customer, 2, "2025-03-08 20:00:00").await;
    let s1 = insert_session(gw, r1, "2025-03-01 19:05:00", 1_250.0).await;
    let s2 = insert_session(gw, r2, "2025-03-08 20:10:00", 890.0).await;

    let o1 = insert_order(gw, s1, 1, "2025-03-01 19:10:00").await;
    let o2 = insert_order(gw, s1, 1, "2025-03-01 20:00:00").await;
    let o3 = insert_order(gw, s2, 2, "2025-03-08 20:15:00").await;
    insert_detail(gw, o1, 1, 2).await;
    insert_detail(gw, o1, 4, 2).await;
    insert_detail(gw, o2, 3, 1).await;
    insert_detail(gw, o3, 2, 1).await;
    insert_detail(gw, o3, 4, 1).await;

    insert_feedback(gw, s1, 5, "Harika").await;
    insert_feedback(gw, s2, 4, "").await;
    customer
}

pub async fn count(gw: &Gateway, table: &str) -> i64 {
    let rows = gw
        .query(&format!("SELECT COUNT(*) AS n FROM {table}"), &[])
        .await
        .unwrap();
    column_i64(&rows, "n")[0]
}

/// Row count of every table
pub async fn snapshot(gw: &Gateway) -> BTreeMap<&'static str, i64> {
    let mut out = BTreeMap::new();
    for table in ALL_TABLES {
        out.insert(table, count(gw, table).await);
    }
    out
}
