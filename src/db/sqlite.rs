//! SQLite database client implementation.
//!
//! Backs disposable sandboxes (a file or `:memory:`) and the test suite.

use super::driver::{connect_with_retry, query_error, single_connection_options};
use crate::config::DatabaseConfig;
use crate::db::{ColumnDescriptor, DatabaseBackend, DatabaseClient, Row, Value};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, TypeInfo, ValueRef};

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens the configured database file (created if missing).
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_with_retry(single_connection_options(), config).await?;
        Ok(Self { pool })
    }

    /// Opens a fresh in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let config = DatabaseConfig {
            backend: Some(DatabaseBackend::Sqlite),
            database: Some(":memory:".to_string()),
            ..Default::default()
        };
        Self::connect(&config).await
    }

    /// Creates a client from an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)
    }

    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info(?1, 'main') ORDER BY cid")
                .bind(table)
                .fetch_all(&self.pool)
                .await
                .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(name, data_type)| ColumnDescriptor { name, data_type })
            .collect())
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        let rows = sqlx::raw_sql(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(rows.iter().map(convert_row).collect())
    }

    /// `sqlite3_changes()` keeps the last DML count across DDL and PRAGMA
    /// statements, so the count is taken from `total_changes()` on the same
    /// connection instead.
    async fn execute_statement(&self, sql: &str) -> Result<u64> {
        let mut conn = self.pool.acquire().await.map_err(query_error)?;

        let before = total_changes(&mut conn).await?;
        conn.execute(sqlx::raw_sql(sql))
            .await
            .map_err(query_error)?;
        let after = total_changes(&mut conn).await?;

        Ok(u64::try_from(after - before).unwrap_or(0))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

async fn total_changes(conn: &mut SqliteConnection) -> Result<i64> {
    sqlx::query_scalar("SELECT total_changes()")
        .fetch_one(conn)
        .await
        .map_err(query_error)
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), convert_value(row, col.ordinal())))
        .collect()
}

/// Converts a single column value from a SqliteRow to our Value type.
///
/// SQLite types values, not columns, so the storage class of the value
/// itself decides the conversion.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
