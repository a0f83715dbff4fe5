//! Result state of the query editor.
//!
//! Holds the outcome of the most recent execution. A failure clears the
//! previous rows so stale data is never shown beside a fresh error.

use super::client::GatewayApi;
use crate::db::{QueryResult, Row};
use crate::error::Result;
use tracing::{info, warn};

/// Outcome of the last query run from the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub rows: Vec<Row>,
    pub message: String,
    pub error: Option<String>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `query` and records the outcome.
    ///
    /// `on_success` runs after a successful execution, for reads and
    /// mutations alike.
    pub async fn execute(
        &mut self,
        api: &dyn GatewayApi,
        query: &str,
        on_success: impl FnOnce(&QueryResult),
    ) -> bool {
        let outcome = api.execute_query(query).await;
        self.apply_with(outcome, on_success)
    }

    /// Records an execution outcome obtained elsewhere. Returns true on success.
    pub fn apply(&mut self, outcome: Result<QueryResult>) -> bool {
        self.apply_with(outcome, |_| {})
    }

    fn apply_with(
        &mut self,
        outcome: Result<QueryResult>,
        on_success: impl FnOnce(&QueryResult),
    ) -> bool {
        match outcome {
            Ok(result) => {
                info!("{}", result.message);
                on_success(&result);
                self.message = result.message;
                self.rows = result.rows;
                self.error = None;
                true
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.error = Some(e.message().to_string());
                self.rows.clear();
                self.message.clear();
                false
            }
        }
    }

    /// True when there is a result or error to show.
    pub fn has_output(&self) -> bool {
        self.error.is_some() || !self.message.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
