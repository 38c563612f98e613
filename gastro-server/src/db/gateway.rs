//! Query gateway
//!
//! The only place that talks to the store. Every handler hands it a SQL
//! statement plus positional parameters and gets back either JSON rows or an
//! affected-row count. Failures come back as [`GatewayError`], never as
//! panics, so callers decide the HTTP mapping.
//!
//! Outside a transaction each call checks a connection out of the pool and
//! returns it when done. [`Gateway::begin`] opens a [`ScopedTransaction`]
//! that pins one connection for several statements; dropping it without
//! [`ScopedTransaction::commit`] rolls everything back.

use std::str::FromStr;
use std::time::Duration;

use base64::Engine;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::error::ErrorKind;
use sqlx::{Column, Row as _, Transaction, TypeInfo, ValueRef};

/// One result row, keyed by column label in select-list order
pub type Row = Map<String, Value>;

type SqliteQuery<'q> =
    sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>>;

/// Tagged store failure
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The store could not be reached (pool exhausted or closed, I/O, protocol)
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),
    /// The store rejected or failed the statement
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl GatewayError {
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Foreign-key, unique, not-null or check constraint rejected the write
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Query(sqlx::Error::Database(db)) => !matches!(db.kind(), ErrorKind::Other),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(e),
            _ => Self::Query(e),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for GatewayError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Query(sqlx::Error::Migrate(Box::new(e)))
    }
}

/// Positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Real(f64),
    /// Stored as REAL; SQLite has no decimal storage class
    Decimal(Decimal),
    Text(String),
    Bool(bool),
    Null,
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<Decimal> for SqlParam {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Store connection settings
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `sqlite://path/to/file.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 8,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Pool-backed query gateway
#[derive(Debug, Clone)]
pub struct Gateway {
    pool: SqlitePool,
}

impl Gateway {
    /// Open the pool. Foreign keys are enforced on every connection and file
    /// databases run in WAL mode so readers never see uncommitted writes.
    pub async fn connect(config: &DbConfig) -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Database pool opened"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the bundled schema
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run a read statement. No match is an empty vector, not an error.
    pub async fn query(
        &self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<Vec<Row>, GatewayError> {
        trace_statement(statement, params);
        let rows = bind(statement, params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_failure(statement, e))?;
        decode_rows(&rows)
    }

    /// Run a write statement and report how many rows it touched
    pub async fn execute(&self, statement: &str, params: &[SqlParam]) -> Result<u64, GatewayError> {
        trace_statement(statement, params);
        let result = bind(statement, params)
            .execute(&self.pool)
            .await
            .map_err(|e| log_failure(statement, e))?;
        Ok(result.rows_affected())
    }

    /// Run an INSERT and return the new row id
    pub async fn insert(&self, statement: &str, params: &[SqlParam]) -> Result<i64, GatewayError> {
        trace_statement(statement, params);
        let result = bind(statement, params)
            .execute(&self.pool)
            .await
            .map_err(|e| log_failure(statement, e))?;
        Ok(result.last_insert_rowid())
    }

    /// Open a scoped transaction pinned to one pooled connection
    pub async fn begin(&self) -> Result<ScopedTransaction, GatewayError> {
        let tx = self.pool.begin().await?;
        Ok(ScopedTransaction { tx, statements: 0 })
    }

    /// Like [`begin`](Self::begin) but takes the write lock up front
    /// (`BEGIN IMMEDIATE`), so a read-then-write unit of work cannot fail
    /// with a stale snapshot when another writer commits in between. Waits
    /// up to the busy timeout for the lock.
    pub async fn begin_immediate(&self) -> Result<ScopedTransaction, GatewayError> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(ScopedTransaction { tx, statements: 0 })
    }
}

/// A unit of work with atomic commit/rollback.
///
/// Dropping without `commit` rolls back (sqlx queues the ROLLBACK when the
/// connection returns to the pool).
pub struct ScopedTransaction {
    tx: Transaction<'static, Sqlite>,
    statements: u32,
}

impl ScopedTransaction {
    pub async fn query(
        &mut self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<Vec<Row>, GatewayError> {
        trace_statement(statement, params);
        self.statements += 1;
        let rows = bind(statement, params)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| log_failure(statement, e))?;
        decode_rows(&rows)
    }

    pub async fn execute(
        &mut self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<u64, GatewayError> {
        trace_statement(statement, params);
        self.statements += 1;
        let result = bind(statement, params)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| log_failure(statement, e))?;
        Ok(result.rows_affected())
    }

    /// Statements issued so far in this transaction
    pub fn statements(&self) -> u32 {
        self.statements
    }

    pub async fn commit(self) -> Result<(), GatewayError> {
        let statements = self.statements;
        self.tx.commit().await?;
        tracing::debug!(statements, "Transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), GatewayError> {
        let statements = self.statements;
        self.tx.rollback().await?;
        tracing::debug!(statements, "Transaction rolled back");
        Ok(())
    }
}

/// Extract an integer column from every row, skipping NULLs
pub fn column_i64(rows: &[Row], column: &str) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get(column).and_then(Value::as_i64))
        .collect()
}

/// `?, ?, ?` for an IN list of `n` elements
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn bind<'q>(statement: &'q str, params: &'q [SqlParam]) -> SqliteQuery<'q> {
    params
        .iter()
        .fold(sqlx::query(statement), |query, param| match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Real(v) => query.bind(*v),
            SqlParam::Decimal(v) => query.bind(v.to_f64()),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Bool(v) => query.bind(*v),
            SqlParam::Null => query.bind(None::<i64>),
        })
}

fn trace_statement(statement: &str, params: &[SqlParam]) {
    tracing::debug!(
        statement = %compact(statement),
        params = params.len(),
        "Executing statement"
    );
}

fn log_failure(statement: &str, e: sqlx::Error) -> GatewayError {
    let err = GatewayError::from(e);
    tracing::error!(statement = %compact(statement), error = %err, "Statement failed");
    err
}

/// Collapse whitespace so multi-line statements log on one line
fn compact(statement: &str) -> String {
    statement.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_rows(rows: &[SqliteRow]) -> Result<Vec<Row>, GatewayError> {
    rows.iter()
        .map(|row| decode_row(row).map_err(GatewayError::from))
        .collect()
}

/// Convert one row to JSON.
///
/// The value's storage class decides the JSON type: INTEGER becomes a
/// number (or a bool for columns declared BOOLEAN), REAL becomes a float so
/// money is never rendered as a string, TEXT stays text, BLOB is base64.
fn decode_row(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut out = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            out.insert(column.name().to_string(), Value::Null);
            continue;
        }
        let storage = raw.type_info().name().to_ascii_uppercase();
        let declared_bool = column.type_info().name().eq_ignore_ascii_case("BOOLEAN");

        let value = match storage.as_str() {
            "INTEGER" | "BOOLEAN" => {
                let v: i64 = row.try_get_unchecked(idx)?;
                if declared_bool {
                    Value::Bool(v != 0)
                } else {
                    Value::from(v)
                }
            }
            "REAL" | "NUMERIC" => {
                let v: f64 = row.try_get_unchecked(idx)?;
                serde_json::Number::from_f64(v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            "BLOB" => {
                let v: Vec<u8> = row.try_get_unchecked(idx)?;
                Value::String(base64::engine::general_purpose::STANDARD.encode(v))
            }
            _ => {
                let v: String = row.try_get_unchecked(idx)?;
                Value::String(v)
            }
        };
        out.insert(column.name().to_string(), value);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_gateway() -> Gateway {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        Gateway::from_pool(pool)
    }

    #[tokio::test]
    async fn test_query_empty_is_not_an_error() {
        let gw = memory_gateway().await;
        gw.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .await
            .unwrap();

        let rows = gw
            .query("SELECT id FROM t WHERE id = ?", &[SqlParam::Int(1)])
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_execute_reports_affected_rows() {
        let gw = memory_gateway().await;
        gw.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .await
            .unwrap();
        gw.execute(
            "INSERT INTO t (name) VALUES (?), (?)",
            &["a".into(), "b".into()],
        )
        .await
        .unwrap();

        let n = gw
            .execute("DELETE FROM t WHERE name = ?", &["zzz".into()])
            .await
            .unwrap();
        assert_eq!(n, 0);

        let n = gw.execute("DELETE FROM t", &[]).await.unwrap();
        assert_eq!(n, 2);
    }

    #[tokio::test]
    async fn test_bad_statement_is_query_error() {
        let gw = memory_gateway().await;
        let err = gw.query("SELECT * FROM missing", &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Query(_)));
        assert!(!err.is_connection());
        assert!(!err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_constraint_violation_detected() {
        let gw = memory_gateway().await;
        gw.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)", &[])
            .await
            .unwrap();
        let err = gw
            .execute("INSERT INTO t (name) VALUES (?)", &[SqlParam::Null])
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_error() {
        let gw = memory_gateway().await;
        gw.pool().close().await;
        let err = gw.query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_row_decoding() {
        let gw = memory_gateway().await;
        gw.execute(
            "CREATE TABLE c (id INTEGER PRIMARY KEY, name TEXT, ltv REAL, vip BOOLEAN, note TEXT)",
            &[],
        )
        .await
        .unwrap();
        gw.execute(
            "INSERT INTO c (name, ltv, vip, note) VALUES (?, ?, ?, ?)",
            &[
                "Ayşe".into(),
                SqlParam::Decimal(Decimal::new(125050, 2)),
                true.into(),
                SqlParam::Null,
            ],
        )
        .await
        .unwrap();

        let rows = gw
            .query("SELECT id, name, ltv, vip, note, 2 * 3 AS six FROM c", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["id"], 1);
        assert_eq!(row["name"], "Ayşe");
        assert_eq!(row["ltv"], 1250.5);
        assert_eq!(row["vip"], true);
        assert_eq!(row["note"], Value::Null);
        assert_eq!(row["six"], 6);

        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, ["id", "name", "ltv", "vip", "note", "six"]);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let gw = memory_gateway().await;
        gw.execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])
            .await
            .unwrap();

        {
            let mut tx = gw.begin().await.unwrap();
            tx.execute("INSERT INTO t (id) VALUES (1)", &[]).await.unwrap();
            assert_eq!(tx.statements(), 1);
        }

        let rows = gw.query("SELECT id FROM t", &[]).await.unwrap();
        assert!(rows.is_empty());

        let mut tx = gw.begin().await.unwrap();
        tx.execute("INSERT INTO t (id) VALUES (2)", &[]).await.unwrap();
        tx.commit().await.unwrap();

        let rows = gw.query("SELECT id FROM t", &[]).await.unwrap();
        assert_eq!(column_i64(&rows, "id"), vec![2]);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn test_option_param() {
        assert_eq!(SqlParam::from(None::<String>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some(5_i64)), SqlParam::Int(5));
    }
}
