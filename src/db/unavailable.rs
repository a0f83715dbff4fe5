//! Stand-in client used when the startup connection failed.
//!
//! The gateway keeps serving; every request fails individually with the
//! original connection error.

use super::{ColumnDescriptor, DatabaseBackend, DatabaseClient, Row};
use crate::error::{Result, SandboxError};
use async_trait::async_trait;

/// A client whose every operation reports the connection failure.
#[derive(Debug, Clone)]
pub struct UnavailableClient {
    backend: DatabaseBackend,
    reason: SandboxError,
}

impl UnavailableClient {
    /// Creates a client that fails with `reason` on every call.
    pub fn new(backend: DatabaseBackend, reason: SandboxError) -> Self {
        Self { backend, reason }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(self.reason.clone())
    }
}

#[async_trait]
impl DatabaseClient for UnavailableClient {
    fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.fail()
    }

    async fn table_schema(&self, _table: &str) -> Result<Vec<ColumnDescriptor>> {
        self.fail()
    }

    async fn fetch_rows(&self, _sql: &str) -> Result<Vec<Row>> {
        self.fail()
    }

    async fn execute_statement(&self, _sql: &str) -> Result<u64> {
        self.fail()
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
