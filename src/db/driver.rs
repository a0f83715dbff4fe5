//! Driver plumbing shared by the sqlx-backed clients.
//!
//! Covers pool creation with connection retries and the mapping of sqlx
//! errors onto `SandboxError`.

use crate::config::DatabaseConfig;
use crate::error::SandboxError;
use sqlx::pool::PoolOptions;
use sqlx::{Database, Pool};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of connection retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Pool options for the gateway's single persistent connection.
///
/// The connection is never recycled, which also keeps an in-memory SQLite
/// database alive for the life of the process.
pub(crate) fn single_connection_options<DB: Database>() -> PoolOptions<DB> {
    PoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(10))
}

/// Connects a pool, retrying transient failures with exponential backoff.
pub(crate) async fn connect_with_retry<DB: Database>(
    options: PoolOptions<DB>,
    config: &DatabaseConfig,
) -> Result<Pool<DB>, SandboxError> {
    let conn_str = config.to_connection_string()?;

    let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);
    let mut attempt = 1;

    loop {
        debug!("Connection attempt {} of {}", attempt, MAX_RETRY_ATTEMPTS);

        match options.clone().connect(&conn_str).await {
            Ok(pool) => {
                debug!("Successfully connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_RETRY_ATTEMPTS && is_transient_error(&e) => {
                warn!(
                    "Connection attempt {} failed (transient error), retrying in {:?}",
                    attempt, delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => return Err(map_connection_error(e, config)),
        }
    }
}

/// Determines if an error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    if matches!(error, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) {
        return true;
    }

    let error_str = error.to_string().to_lowercase();

    error_str.contains("connection refused")
        || error_str.contains("timed out")
        || error_str.contains("temporarily unavailable")
        || error_str.contains("connection reset")
        || error_str.contains("broken pipe")
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &DatabaseConfig) -> SandboxError {
    let host = config.host();
    let port = config.port();
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") {
        SandboxError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") || error_str.contains("authentication failed") {
        SandboxError::connection(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            config.user()
        ))
    } else if error_str.contains("unknown database")
        || (error_str.contains("does not exist") && error_str.contains("database"))
    {
        SandboxError::connection(format!("Database '{}' does not exist.", config.database()))
    } else if error_str.contains("timed out") {
        SandboxError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        SandboxError::connection(driver_message(&error))
    }
}

/// Maps a query failure to a `SandboxError` carrying the driver's own text.
pub(crate) fn query_error(error: sqlx::Error) -> SandboxError {
    SandboxError::query(driver_message(&error))
}

/// The database's message when the server reported one, else sqlx's.
fn driver_message(error: &sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
