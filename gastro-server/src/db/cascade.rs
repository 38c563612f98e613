//! Cascade deletion orchestrator
//!
//! Removes a root row and everything that transitively references it, inside
//! one scoped transaction. The walk is driven by [`ReferentialGraph`]:
//!
//! 1. existence check on the root primary key (miss → `NotFound`, no writes)
//! 2. `BEGIN IMMEDIATE`
//! 3. resolve dependent ids level by level, parents first
//! 4. delete deepest level first, the root last
//! 5. `COMMIT`, or `ROLLBACK` on any failure
//!
//! A cascade either commits completely or leaves every table untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use super::gateway::{Gateway, GatewayError, ScopedTransaction, SqlParam, column_i64, placeholders};
use super::graph::{DeletionPlan, Entity, ReferentialGraph};

/// Max ids bound into one `IN (...)` list
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Result of one cascade invocation
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome {
    Deleted(CascadeReport),
    NotFound,
    Failed(String),
}

/// Rows removed per table by a committed cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub root: &'static str,
    pub root_id: i64,
    pub removed: BTreeMap<&'static str, u64>,
}

impl CascadeReport {
    fn new(root: Entity, root_id: i64) -> Self {
        Self {
            root: root.table(),
            root_id,
            removed: BTreeMap::new(),
        }
    }

    pub fn removed(&self, table: &str) -> u64 {
        self.removed.get(table).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.removed.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct CascadeDeleter {
    gateway: Gateway,
    graph: ReferentialGraph,
    batch_size: usize,
}

impl CascadeDeleter {
    pub fn new(gateway: Gateway, graph: ReferentialGraph) -> Self {
        Self {
            gateway,
            graph,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Delete a customer with its dietary restrictions, reservations, dining
    /// sessions, orders, order details and feedback
    pub async fn delete_customer(&self, customer_id: i64) -> CascadeOutcome {
        self.delete_cascade(Entity::Customer, customer_id).await
    }

    pub async fn delete_cascade(&self, root: Entity, id: i64) -> CascadeOutcome {
        let plan = match self.graph.deletion_plan(root) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!(root = %root, id, error = %e, "Cascade plan rejected");
                return CascadeOutcome::Failed(e.to_string());
            }
        };

        match self.exists(root, id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(root = %root, id, "Cascade root not found");
                return CascadeOutcome::NotFound;
            }
            Err(e) => return CascadeOutcome::Failed(e.to_string()),
        }

        let mut tx = match self.gateway.begin_immediate().await {
            Ok(tx) => tx,
            Err(e) => return CascadeOutcome::Failed(e.to_string()),
        };

        match self.run(&mut tx, &plan, id).await {
            Ok(Some(report)) => match tx.commit().await {
                Ok(()) => {
                    tracing::info!(
                        root = %root,
                        id,
                        total = report.total(),
                        removed = ?report.removed,
                        "Cascade delete committed"
                    );
                    CascadeOutcome::Deleted(report)
                }
                Err(e) => {
                    tracing::error!(root = %root, id, error = %e, "Cascade commit failed");
                    CascadeOutcome::Failed(e.to_string())
                }
            },
            Ok(None) => {
                // Root vanished between the existence check and the delete
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(root = %root, id, error = %e, "Rollback failed");
                }
                tracing::debug!(root = %root, id, "Cascade root deleted concurrently");
                CascadeOutcome::NotFound
            }
            Err(e) => {
                let statements = tx.statements();
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!(root = %root, id, error = %rb, "Rollback failed");
                }
                tracing::error!(
                    root = %root,
                    id,
                    statements,
                    error = %e,
                    "Cascade delete rolled back"
                );
                CascadeOutcome::Failed(e.to_string())
            }
        }
    }

    async fn exists(&self, entity: Entity, id: i64) -> Result<bool, GatewayError> {
        let statement = format!(
            "SELECT {pk} FROM {table} WHERE {pk} = ?",
            pk = entity.primary_key(),
            table = entity.table()
        );
        let rows = self.gateway.query(&statement, &[SqlParam::Int(id)]).await?;
        Ok(!rows.is_empty())
    }

    /// `Ok(None)` when the root delete touched nothing
    async fn run(
        &self,
        tx: &mut ScopedTransaction,
        plan: &DeletionPlan,
        id: i64,
    ) -> Result<Option<CascadeReport>, GatewayError> {
        let ids = self.resolve(tx, plan, id).await?;
        let mut report = CascadeReport::new(plan.root(), id);

        for step in plan.deletion_order() {
            let entity = step.entity;
            let targets = ids.get(&entity).map(Vec::as_slice).unwrap_or_default();

            if entity == plan.root() {
                let statement = format!(
                    "DELETE FROM {} WHERE {} = ?",
                    entity.table(),
                    entity.primary_key()
                );
                let affected = tx.execute(&statement, &[SqlParam::Int(id)]).await?;
                if affected == 0 {
                    return Ok(None);
                }
                report.removed.insert(entity.table(), affected);
                continue;
            }

            let mut removed = 0;
            for chunk in targets.chunks(self.batch_size) {
                let statement = format!(
                    "DELETE FROM {} WHERE {} IN ({})",
                    entity.table(),
                    entity.primary_key(),
                    placeholders(chunk.len())
                );
                removed += tx.execute(&statement, &int_params(chunk)).await?;
            }
            report.removed.insert(entity.table(), removed);
        }

        Ok(Some(report))
    }

    /// Primary keys of every entity in the plan, parents first
    async fn resolve(
        &self,
        tx: &mut ScopedTransaction,
        plan: &DeletionPlan,
        id: i64,
    ) -> Result<BTreeMap<Entity, Vec<i64>>, GatewayError> {
        let mut ids = BTreeMap::from([(plan.root(), vec![id])]);

        for step in plan.resolution_order() {
            if step.entity == plan.root() {
                continue;
            }
            let mut found = Vec::new();
            for edge in &step.via {
                let parents = ids.get(&edge.parent).cloned().unwrap_or_default();
                for chunk in parents.chunks(self.batch_size) {
                    let statement = format!(
                        "SELECT {pk} FROM {table} WHERE {fk} IN ({list})",
                        pk = step.entity.primary_key(),
                        table = step.entity.table(),
                        fk = edge.foreign_key,
                        list = placeholders(chunk.len())
                    );
                    let rows = tx.query(&statement, &int_params(chunk)).await?;
                    found.extend(column_i64(&rows, step.entity.primary_key()));
                }
            }
            found.sort_unstable();
            found.dedup();
            tracing::debug!(entity = %step.entity, depth = step.depth, count = found.len(), "Resolved dependents");
            ids.insert(step.entity, found);
        }

        Ok(ids)
    }
}

fn int_params(ids: &[i64]) -> Vec<SqlParam> {
    ids.iter().copied().map(SqlParam::Int).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded() -> (Gateway, CascadeDeleter) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        let gw = Gateway::from_pool(pool);
        gw.migrate().await.unwrap();

        for stmt in [
            "INSERT INTO customers (customer_id, full_name) VALUES (1, 'Deniz Kaya')",
            "INSERT INTO dining_tables (table_id, capacity) VALUES (1, 4)",
            "INSERT INTO reservations (reservation_id, customer_id, table_id, reservation_time) VALUES (1, 1, 1, '2025-01-01 19:00:00')",
            "INSERT INTO dining_sessions (session_id, reservation_id, start_time) VALUES (1, 1, '2025-01-01 19:05:00')",
            "INSERT INTO dining_sessions (session_id, reservation_id, start_time) VALUES (2, 1, '2025-01-01 21:00:00')",
            "INSERT INTO dining_sessions (session_id, reservation_id, start_time) VALUES (3, 1, '2025-01-01 22:00:00')",
            "INSERT INTO feedback (session_id, rating) VALUES (1, 5), (2, 4), (3, 3)",
        ] {
            gw.execute(stmt, &[]).await.unwrap();
        }

        let deleter = CascadeDeleter::new(gw.clone(), ReferentialGraph::restaurant());
        (gw, deleter)
    }

    async fn count(gw: &Gateway, table: &str) -> i64 {
        let rows = gw
            .query(&format!("SELECT COUNT(*) AS n FROM {table}"), &[])
            .await
            .unwrap();
        column_i64(&rows, "n")[0]
    }

    #[tokio::test]
    async fn test_small_batches_cover_every_id() {
        let (gw, deleter) = seeded().await;
        let deleter = deleter.with_batch_size(2);

        let outcome = deleter.delete_customer(1).await;
        let CascadeOutcome::Deleted(report) = outcome else {
            panic!("expected Deleted, got {outcome:?}");
        };
        assert_eq!(report.root, "customers");
        assert_eq!(report.removed("dining_sessions"), 3);
        assert_eq!(report.removed("feedback"), 3);
        assert_eq!(report.removed("orders"), 0);
        assert_eq!(report.total(), 1 + 1 + 3 + 3);

        assert_eq!(count(&gw, "feedback").await, 0);
        assert_eq!(count(&gw, "customers").await, 0);
        assert_eq!(count(&gw, "dining_tables").await, 1);
    }

    #[tokio::test]
    async fn test_inner_root_leaves_ancestors() {
        let (gw, deleter) = seeded().await;

        let outcome = deleter.delete_cascade(Entity::DiningSession, 2).await;
        assert!(matches!(outcome, CascadeOutcome::Deleted(_)));
        assert_eq!(count(&gw, "dining_sessions").await, 2);
        assert_eq!(count(&gw, "feedback").await, 2);
        assert_eq!(count(&gw, "reservations").await, 1);
    }

    #[tokio::test]
    async fn test_missing_root() {
        let (_gw, deleter) = seeded().await;
        assert_eq!(deleter.delete_customer(42).await, CascadeOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_plain_delete_is_rejected_by_foreign_keys() {
        let (gw, _deleter) = seeded().await;
        let err = gw
            .execute("DELETE FROM customers WHERE customer_id = 1", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Query(_)));
    }
}
