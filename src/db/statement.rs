//! Statement dispatch for arbitrary SQL text.
//!
//! The gateway never parses SQL. It only decides whether a statement should be
//! fetched as rows or executed for an affected-row count, using the leading
//! keyword of the text.

use super::Row;
use serde::{Deserialize, Serialize};

/// How a piece of SQL text is run against the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Text starting with `select`: fetch and return every row.
    RowReturning,
    /// Anything else (DML, DDL, SHOW, ...): report the affected-row count.
    Mutation,
}

impl StatementKind {
    /// Classifies SQL text by its trimmed, case-insensitive `select` prefix.
    pub fn classify(sql: &str) -> Self {
        let head = sql.trim_start();
        let is_select = head
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"));

        if is_select {
            Self::RowReturning
        } else {
            Self::Mutation
        }
    }
}

/// The outcome of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// Rows fetched by a row-returning statement.
    Rows(Vec<Row>),
    /// Affected-row count reported by the driver (0 when not applicable).
    Affected(u64),
}

impl StatementOutcome {
    /// Returns the summary message shown alongside the result.
    pub fn message(&self) -> String {
        match self {
            Self::Rows(rows) => format!("{} rows returned", rows.len()),
            Self::Affected(count) => format!("{count} rows affected"),
        }
    }

    /// Converts into the wire-level query result.
    pub fn into_result(self) -> QueryResult {
        let message = self.message();
        let rows = match self {
            Self::Rows(rows) => rows,
            Self::Affected(_) => Vec::new(),
        };
        QueryResult { rows, message }
    }
}

/// Rows plus a summary message, as returned by execute-query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Returned rows (always empty for non-select statements).
    #[serde(rename = "data")]
    pub rows: Vec<Row>,

    /// `"<N> rows returned"` or `"<N> rows affected"`.
    pub message: String,
}
