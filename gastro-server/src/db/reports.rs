//! Canned analytical reports
//!
//! Each report is a read-only statement looked up by its URL slug.

use super::gateway::{Gateway, GatewayError, Row};

#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub name: &'static str,
    pub description: &'static str,
    statement: &'static str,
}

impl Report {
    pub async fn run(&self, gw: &Gateway) -> Result<Vec<Row>, GatewayError> {
        tracing::debug!(report = self.name, "Running report");
        gw.query(self.statement, &[]).await
    }
}

pub fn find(name: &str) -> Option<&'static Report> {
    REPORTS.iter().find(|r| r.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    REPORTS.iter().map(|r| r.name)
}

pub static REPORTS: &[Report] = &[
    Report {
        name: "top-customer-orders",
        description: "Highest-grossing dining session",
        statement: r#"
            SELECT ds.session_id, c.full_name, ds.total_amount, ds.start_time
            FROM dining_sessions ds
            JOIN reservations r ON ds.reservation_id = r.reservation_id
            JOIN customers c ON r.customer_id = c.customer_id
            ORDER BY ds.total_amount DESC
            LIMIT 1
        "#,
    },
    Report {
        name: "category-revenue",
        description: "Revenue and order count per menu category",
        statement: r#"
            SELECT c.category_name,
                   SUM(m.price * od.quantity) AS total_revenue,
                   COUNT(DISTINCT o.order_id) AS order_count,
                   ROUND(AVG(m.price * od.quantity), 2) AS avg_order_value
            FROM order_details od
            JOIN menu_items m ON od.item_id = m.item_id
            JOIN categories c ON m.category_id = c.category_id
            JOIN orders o ON od.order_id = o.order_id
            GROUP BY c.category_id, c.category_name
            HAVING SUM(m.price * od.quantity) > 0
            ORDER BY total_revenue DESC
        "#,
    },
    Report {
        name: "customer-spending",
        description: "Visits, total and average spend per customer",
        statement: r#"
            SELECT cust.customer_id, cust.full_name, cust.vip_status,
                   COUNT(ds.session_id) AS visit_count,
                   SUM(ds.total_amount) AS total_spent,
                   ROUND(AVG(ds.total_amount), 2) AS avg_per_visit,
                   strftime('%Y-%m-%d', MAX(ds.start_time)) AS last_visit
            FROM customers cust
            JOIN reservations res ON cust.customer_id = res.customer_id
            JOIN dining_sessions ds ON res.reservation_id = ds.reservation_id
            GROUP BY cust.customer_id, cust.full_name, cust.vip_status
            ORDER BY total_spent DESC
        "#,
    },
    Report {
        name: "customer-classification",
        description: "Customer tier by lifetime value and VIP flag",
        statement: r#"
            SELECT customer_id, full_name, vip_status, total_ltv,
                   CASE
                       WHEN total_ltv > 40000 AND vip_status = 1 THEN 'Platinum'
                       WHEN total_ltv > 10000 AND vip_status = 1 THEN 'Gold'
                       WHEN total_ltv > 1000 THEN 'Silver'
                       WHEN total_ltv > 0 THEN 'Regular'
                       ELSE 'Inactive'
                   END AS customer_tier
            FROM customers
            ORDER BY total_ltv DESC
        "#,
    },
    Report {
        name: "table-performance",
        description: "Bookings, completed sessions and revenue per table",
        statement: r#"
            SELECT t.table_id, t.capacity, t.location_zone,
                   COUNT(r.reservation_id) AS total_bookings,
                   COUNT(ds.session_id) AS completed_sessions,
                   ROUND(AVG(ds.total_amount), 2) AS avg_revenue,
                   SUM(ds.total_amount) AS total_revenue,
                   ROUND(COUNT(ds.session_id) * 100.0 / NULLIF(COUNT(r.reservation_id), 0), 1)
                       AS completion_rate
            FROM dining_tables t
            LEFT JOIN reservations r ON t.table_id = r.table_id
            LEFT JOIN dining_sessions ds ON r.reservation_id = ds.reservation_id
            GROUP BY t.table_id, t.capacity, t.location_zone
            ORDER BY total_revenue DESC
        "#,
    },
    Report {
        name: "customer-first-last-visit",
        description: "First and last visit per customer and the days between",
        statement: r#"
            SELECT cust.customer_id,
                   cust.full_name,
                   MIN(ds.start_time) AS first_visit,
                   MAX(ds.start_time) AS last_visit,
                   CAST(julianday(date(MAX(ds.start_time))) - julianday(date(MIN(ds.start_time)))
                       AS INTEGER) AS customer_lifetime_days
            FROM customers cust
            JOIN reservations r ON cust.customer_id = r.customer_id
            JOIN dining_sessions ds ON r.reservation_id = ds.reservation_id
            GROUP BY cust.customer_id, cust.full_name
            ORDER BY cust.customer_id
        "#,
    },
    Report {
        name: "top-menu-items",
        description: "Ten most ordered menu items",
        statement: r#"
            SELECT m.name AS item_name,
                   c.category_name,
                   SUM(od.quantity) AS total_quantity,
                   COUNT(DISTINCT o.order_id) AS order_count,
                   ROUND(AVG(m.price), 2) AS avg_price
            FROM order_details od
            JOIN menu_items m ON od.item_id = m.item_id
            JOIN categories c ON m.category_id = c.category_id
            JOIN orders o ON od.order_id = o.order_id
            GROUP BY m.item_id, m.name, c.category_name
            HAVING SUM(od.quantity) > 0
            ORDER BY total_quantity DESC
            LIMIT 10
        "#,
    },
    Report {
        name: "staff-performance",
        description: "Orders and session revenue per waiter and host",
        statement: r#"
            SELECT s.staff_id, s.name, s.role,
                   COUNT(DISTINCT o.order_id) AS total_orders,
                   SUM(ds.total_amount) AS total_revenue,
                   ROUND(AVG(ds.total_amount), 2) AS avg_order_value
            FROM staff s
            LEFT JOIN orders o ON s.staff_id = o.staff_id
            LEFT JOIN dining_sessions ds ON o.session_id = ds.session_id
            WHERE s.role IN ('Garson', 'Host')
            GROUP BY s.staff_id, s.name, s.role
            HAVING COUNT(DISTINCT o.order_id) > 0
            ORDER BY total_revenue DESC
        "#,
    },
    Report {
        name: "daily-revenue",
        description: "Session count and revenue per day",
        statement: r#"
            SELECT DATE(ds.start_time) AS date,
                   COUNT(DISTINCT ds.session_id) AS total_sessions,
                   SUM(ds.total_amount) AS daily_revenue,
                   ROUND(AVG(ds.total_amount), 2) AS avg_session_revenue
            FROM dining_sessions ds
            GROUP BY DATE(ds.start_time)
            HAVING SUM(ds.total_amount) > 0
            ORDER BY date DESC
        "#,
    },
    Report {
        name: "reservation-status-analysis",
        description: "Share and average party size per reservation status",
        statement: r#"
            SELECT r.status,
                   COUNT(*) AS total_reservations,
                   ROUND(COUNT(*) * 100.0 / (SELECT COUNT(*) FROM reservations), 2) AS percentage,
                   AVG(r.party_size) AS avg_party_size
            FROM reservations r
            GROUP BY r.status
            ORDER BY total_reservations DESC
        "#,
    },
    Report {
        name: "dietary-preferences",
        description: "Categories ordered by customers with dietary restrictions",
        statement: r#"
            SELECT dr.restriction_type,
                   c.category_name,
                   COUNT(DISTINCT od.detail_id) AS total_orders,
                   SUM(od.quantity) AS total_quantity
            FROM dietary_restrictions dr
            JOIN customers cust ON dr.customer_id = cust.customer_id
            JOIN reservations r ON cust.customer_id = r.customer_id
            JOIN dining_sessions ds ON r.reservation_id = ds.reservation_id
            JOIN orders o ON ds.session_id = o.session_id
            JOIN order_details od ON o.order_id = od.order_id
            JOIN menu_items m ON od.item_id = m.item_id
            JOIN categories c ON m.category_id = c.category_id
            GROUP BY dr.restriction_type, c.category_name
            HAVING COUNT(DISTINCT od.detail_id) > 0
            ORDER BY dr.restriction_type, total_orders DESC
        "#,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_report_names_unique() {
        let names: HashSet<&str> = names().collect();
        assert_eq!(names.len(), REPORTS.len());
        assert_eq!(REPORTS.len(), 11);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("daily-revenue").map(|r| r.name), Some("daily-revenue"));
        assert!(find("revenue").is_none());
    }

    #[tokio::test]
    async fn test_every_report_runs_on_empty_schema() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let gw = Gateway::from_pool(pool);
        gw.migrate().await.unwrap();

        for report in REPORTS {
            let rows = report.run(&gw).await.unwrap();
            assert!(rows.is_empty(), "{} returned rows", report.name);
        }
    }
}
