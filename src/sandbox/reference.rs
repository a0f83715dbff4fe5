//! Reference data shown beside the editor.
//!
//! Loading issues the schema fetch for the reference table and the table
//! listing concurrently, then fetches every listed table's rows concurrently.
//! Each fetch keeps its own outcome so a partial failure still shows whatever
//! did load.

use super::client::GatewayApi;
use crate::db::{ColumnDescriptor, Row};
use crate::error::{Result, SandboxError};
use futures::future::join_all;
use tracing::{debug, warn};

/// Rows of one listed table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub name: String,
    pub rows: Result<Vec<Row>>,
}

/// Everything fetched by one reference load.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub table: String,
    pub schema: Result<Vec<ColumnDescriptor>>,
    pub tables: Result<Vec<TableSnapshot>>,
}

impl ReferenceData {
    /// Fetches the schema of `table` and the rows of every table.
    pub async fn load(api: &dyn GatewayApi, table: &str) -> Self {
        let (schema, tables) = futures::join!(api.table_schema(table), load_tables(api));

        if let Err(e) = &schema {
            warn!("Failed to load schema for {}: {}", table, e);
        }

        let data = Self {
            table: table.to_string(),
            schema,
            tables,
        };

        if let Some(e) = data.first_error() {
            warn!("Reference data incomplete: {}", e);
        }
        data
    }

    /// Every fetch failure, schema first, then listing, then tables in order.
    pub fn errors(&self) -> Vec<&SandboxError> {
        let mut errors = Vec::new();
        if let Err(e) = &self.schema {
            errors.push(e);
        }
        match &self.tables {
            Err(e) => errors.push(e),
            Ok(tables) => errors.extend(tables.iter().filter_map(|t| t.rows.as_ref().err())),
        }
        errors
    }

    /// The first fetch failure, if any.
    pub fn first_error(&self) -> Option<&SandboxError> {
        self.errors().into_iter().next()
    }

    /// True when every fetch succeeded.
    pub fn is_complete(&self) -> bool {
        self.first_error().is_none()
    }

    /// The reference table's columns, or nothing if that fetch failed.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.schema.as_deref().unwrap_or(&[])
    }

    /// Tables whose rows loaded, in listing order.
    pub fn loaded_tables(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.tables
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter_map(|t| t.rows.as_deref().ok().map(|rows| (t.name.as_str(), rows)))
    }
}

async fn load_tables(api: &dyn GatewayApi) -> Result<Vec<TableSnapshot>> {
    let names = api.list_tables().await?;
    debug!("Loading rows for {} tables", names.len());

    let fetches = names.into_iter().map(|name| async move {
        let rows = api.table_data(&name).await;
        TableSnapshot { name, rows }
    });

    Ok(join_all(fetches).await)
}
