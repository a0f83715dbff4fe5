//! Sandbox logic shared by the terminal UI and the headless checker.
//!
//! Everything here talks to the gateway through `GatewayApi`; nothing touches
//! the database directly.

mod client;
mod editor;
mod mock;
mod reference;
mod test_cases;

pub use client::{GatewayApi, GatewayClient};
pub use editor::EditorState;
pub use mock::MockGateway;
pub use reference::{ReferenceData, TableSnapshot};
pub use test_cases::{builtin_test_cases, rows_match, TestCase, TestSuite};

use std::io::Write;
use tracing::info;

/// Title of the exercise.
pub const QUESTION_TITLE: &str = "Find Employees Earning Above Average in Their Department";

/// Body of the exercise.
pub const QUESTION_TEXT: &str = "Write a SQL query to find the names of employees who earn more than the average salary in their department.";

/// Runs an optional editor query, then every test case, writing a report.
///
/// Returns true when every case passed. A failing editor query is reported
/// but does not stop the test run.
pub async fn run_check(
    api: &dyn GatewayApi,
    query: Option<&str>,
    out: &mut impl Write,
) -> std::io::Result<bool> {
    let mut suite = TestSuite::builtin();

    if let Some(query) = query {
        let mut editor = EditorState::new();
        editor.execute(api, query, |_| {}).await;
        match &editor.error {
            Some(error) => writeln!(out, "Error: {error}")?,
            None => {
                writeln!(out, "{}", editor.message)?;
                for row in &editor.rows {
                    let line = row
                        .iter()
                        .map(|(column, value)| format!("{column}={value}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(out, "  {line}")?;
                }
            }
        }
    }

    suite.run_all(api).await;
    for case in suite.cases() {
        writeln!(out, "Testcase {}: {}", case.id, case.status_label())?;
    }

    let all_passed = suite.passed_count() == suite.cases().len();
    info!("Check finished, all passed: {}", all_passed);
    Ok(all_passed)
}
