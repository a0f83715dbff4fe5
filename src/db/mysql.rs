//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient`
//! trait for MySQL and MariaDB using sqlx.

use super::driver::{connect_with_retry, query_error, single_connection_options};
use crate::config::DatabaseConfig;
use crate::db::{ColumnDescriptor, DatabaseBackend, DatabaseClient, Row, Value};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};

/// MySQL database client.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
    database: String,
}

impl MySqlClient {
    /// Connects using the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_with_retry(single_connection_options(), config).await?;
        Ok(Self::from_pool(pool, config.database()))
    }

    /// Creates a client from an existing pool.
    ///
    /// `database` scopes the information-schema lookups.
    pub fn from_pool(pool: MySqlPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::raw_sql("SHOW TABLES")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| row.try_get_unchecked::<String, _>(0).map_err(query_error))
            .collect()
    }

    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT CAST(COLUMN_NAME AS CHAR), CAST(DATA_TYPE AS CHAR)
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
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

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .map(|col| {
            let value = convert_value(row, col.ordinal(), col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
///
/// Rows come back over the text protocol, so every decode goes through the
/// unchecked path and parses the server's textual form.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Err(_) => return Value::Null,
        Ok(_) => {}
    }

    let type_name = type_name.to_uppercase();

    if type_name.ends_with("UNSIGNED") {
        return match row.try_get_unchecked::<u64, _>(index) {
            Ok(v) => i64::try_from(v)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::String(v.to_string())),
            Err(_) => text_value(row, index),
        };
    }

    match type_name.as_str() {
        // TINYINT(1) is reported as BOOLEAN; it is still an integer on the wire.
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or_else(|_| text_value(row, index)),

        "FLOAT" | "DOUBLE" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or_else(|_| text_value(row, index)),

        // DECIMAL is read as a number, not the driver's string form, so AVG and
        // SUM results compare equal to numeric expectations.
        "DECIMAL" => match text_value(row, index) {
            Value::String(s) => s.parse::<f64>().map(Value::Float).unwrap_or(Value::String(s)),
            other => other,
        },

        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT"
        | "GEOMETRY" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => text_value(row, index),
    }
}

fn text_value(row: &MySqlRow, index: usize) -> Value {
    row.try_get_unchecked::<Option<String>, _>(index)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}
