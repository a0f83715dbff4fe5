//! Database abstraction layer for SQL Sandbox.
//!
//! Provides a trait-based interface for the handful of operations the gateway
//! exposes, allowing different database backends to be used interchangeably.

mod driver;
mod identifier;
mod mysql;
mod postgres;
mod seed;
mod sqlite;
mod statement;
mod types;
mod unavailable;

pub use identifier::quote_identifier;
pub use mysql::MySqlClient;
pub use postgres::PostgresClient;
pub use seed::{apply_seed, seed_statements, SEED_SQL};
pub use sqlite::SqliteClient;
pub use statement::{QueryResult, StatementKind, StatementOutcome};
pub use types::{ColumnDescriptor, Row, Value};
pub use unavailable::UnavailableClient;

use crate::config::DatabaseConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    MySql,
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the backend as a string for display and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns the default port for this backend (0 for file-based SQLite).
    pub fn default_port(&self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::Postgres => 5432,
            Self::Sqlite => 0,
        }
    }

    /// Returns the URL scheme for this backend.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl std::str::FromStr for DatabaseBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid database backend: {s}. Expected: mysql, postgres, or sqlite")
        })
    }
}

/// Creates a database client for the configured backend.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DatabaseClient>> {
    let client: Arc<dyn DatabaseClient> = match config.backend() {
        DatabaseBackend::MySql => Arc::new(MySqlClient::connect(config).await?),
        DatabaseBackend::Postgres => Arc::new(PostgresClient::connect(config).await?),
        DatabaseBackend::Sqlite => Arc::new(SqliteClient::connect(config).await?),
    };
    Ok(client)
}

/// Connects, or logs the failure and returns a client that reports it on
/// every call. The gateway keeps serving either way.
pub async fn connect_or_unavailable(config: &DatabaseConfig) -> Arc<dyn DatabaseClient> {
    match connect(config).await {
        Ok(client) => {
            info!("Successfully connected to {}", config.display_string());
            client
        }
        Err(e) => {
            error!("Error connecting to the database: {}", e.message());
            Arc::new(UnavailableClient::new(config.backend(), e))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// Implementations provide the driver-level primitives. Statement dispatch
/// and identifier-quoted table reads are shared provided methods.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Returns the backend this client talks to.
    fn backend(&self) -> DatabaseBackend;

    /// Lists table names in driver-native order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Looks up the columns of a table in the configured database.
    ///
    /// An unknown table yields an empty list.
    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Runs SQL text and returns every row it produces.
    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>>;

    /// Runs SQL text and returns the driver's affected-row count.
    async fn execute_statement(&self, sql: &str) -> Result<u64>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;

    /// Returns every row of a table, addressing it as a quoted identifier.
    async fn table_data(&self, table: &str) -> Result<Vec<Row>> {
        let sql = format!("SELECT * FROM {}", quote_identifier(self.backend(), table));
        self.fetch_rows(&sql).await
    }

    /// Executes arbitrary SQL, dispatching on its leading keyword.
    async fn execute(&self, sql: &str) -> Result<StatementOutcome> {
        match StatementKind::classify(sql) {
            StatementKind::RowReturning => self.fetch_rows(sql).await.map(StatementOutcome::Rows),
            StatementKind::Mutation => self
                .execute_statement(sql)
                .await
                .map(StatementOutcome::Affected),
        }
    }
}
