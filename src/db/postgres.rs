//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient`
//! trait for PostgreSQL databases using sqlx.

use super::driver::{connect_with_retry, query_error, single_connection_options};
use crate::config::DatabaseConfig;
use crate::db::{ColumnDescriptor, DatabaseBackend, DatabaseClient, Row, Value};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};

/// PostgreSQL database client.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
    database: String,
}

impl PostgresClient {
    /// Connects using the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_with_retry(single_connection_options(), config).await?;
        Ok(Self::from_pool(pool, config.database()))
    }

    /// Creates a new PostgresClient from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    pub fn from_pool(pool: PgPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)
    }

    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT column_name::text, data_type::text
            FROM information_schema.columns
            WHERE table_catalog = $1
                AND table_schema = current_schema()
                AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(&self.database)
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

    async fn execute_statement(&self, sql: &str) -> Result<u64> {
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .map(|col| {
            let value = convert_value(row, col.ordinal(), col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Err(_) => return Value::Null,
        Ok(_) => {}
    }

    match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => row
            .try_get_unchecked::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or_else(|_| text_value(row, index)),

        "INT2" | "SMALLINT" => row
            .try_get_unchecked::<i16, _>(index)
            .map(|v| Value::Int(v as i64))
            .unwrap_or_else(|_| text_value(row, index)),

        "INT4" | "INT" | "INTEGER" => row
            .try_get_unchecked::<i32, _>(index)
            .map(|v| Value::Int(v as i64))
            .unwrap_or_else(|_| text_value(row, index)),

        "INT8" | "BIGINT" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or_else(|_| text_value(row, index)),

        "FLOAT4" | "REAL" => row
            .try_get_unchecked::<f32, _>(index)
            .map(|v| Value::Float(v as f64))
            .unwrap_or_else(|_| text_value(row, index)),

        "FLOAT8" | "DOUBLE PRECISION" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or_else(|_| text_value(row, index)),

        "NUMERIC" => match text_value(row, index) {
            Value::String(s) => s.parse::<f64>().map(Value::Float).unwrap_or(Value::String(s)),
            other => other,
        },

        "BYTEA" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // For all other types, take the server's text form
        _ => text_value(row, index),
    }
}

fn text_value(row: &PgRow, index: usize) -> Value {
    row.try_get_unchecked::<Option<String>, _>(index)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}
