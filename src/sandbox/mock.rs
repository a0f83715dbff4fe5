//! Mock gateway for testing.
//!
//! Serves canned tables and query results from memory and records every
//! query it is asked to execute.

use super::client::GatewayApi;
use crate::db::{ColumnDescriptor, QueryResult, Row};
use crate::error::{Result, SandboxError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A gateway that answers from predefined data.
#[derive(Debug, Default)]
pub struct MockGateway {
    tables: Vec<String>,
    schemas: HashMap<String, Vec<ColumnDescriptor>>,
    data: HashMap<String, Vec<Row>>,
    results: HashMap<String, QueryResult>,
    failure: Option<SandboxError>,
    executed: Mutex<Vec<String>>,
}

impl MockGateway {
    /// Creates a mock gateway with no tables and no known queries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table with its schema and rows.
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        schema: Vec<ColumnDescriptor>,
        rows: Vec<Row>,
    ) -> Self {
        let name = name.into();
        self.tables.push(name.clone());
        self.schemas.insert(name.clone(), schema);
        self.data.insert(name, rows);
        self
    }

    /// Registers the result returned for an exact query text.
    pub fn with_result(mut self, query: impl Into<String>, result: QueryResult) -> Self {
        self.results.insert(query.into(), result);
        self
    }

    /// Makes every call fail with the given error.
    pub fn failing(mut self, error: SandboxError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Returns the queries executed so far, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GatewayApi for MockGateway {
    async fn list_tables(&self) -> Result<Vec<String>> {
        self.check_failure()?;
        Ok(self.tables.clone())
    }

    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        self.check_failure()?;
        Ok(self.schemas.get(table).cloned().unwrap_or_default())
    }

    async fn table_data(&self, table: &str) -> Result<Vec<Row>> {
        self.check_failure()?;
        self.data
            .get(table)
            .cloned()
            .ok_or_else(|| SandboxError::query(format!("Table '{table}' doesn't exist")))
    }

    async fn execute_query(&self, query: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(query.to_string());
        }
        self.check_failure()?;
        self.results.get(query).cloned().ok_or_else(|| {
            SandboxError::query("You have an error in your SQL syntax")
        })
    }
}
