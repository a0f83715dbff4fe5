//! The fixed exercise test cases and their evaluation.
//!
//! A case passes when the rows its query returns serialize to exactly the
//! same JSON as the expected rows: order, column order and value types all
//! count. A query that fails to execute is a non-match, not an error.

use super::client::GatewayApi;
use crate::db::Row;
use crate::row;
use futures::future::join_all;
use tracing::{debug, info};

/// One (query, expected rows) pair and its latest verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub id: u32,
    pub query: String,
    pub expected: Vec<Row>,
    pub passed: bool,
}

impl TestCase {
    /// Creates an unchecked test case.
    pub fn new(id: u32, query: impl Into<String>, expected: Vec<Row>) -> Self {
        Self {
            id,
            query: query.into(),
            expected,
            passed: false,
        }
    }

    /// Returns "Passed" or "Failed".
    pub fn status_label(&self) -> &'static str {
        if self.passed {
            "Passed"
        } else {
            "Failed"
        }
    }
}

/// Compares result rows by their serialized form.
pub fn rows_match(actual: &[Row], expected: &[Row]) -> bool {
    match (serde_json::to_string(actual), serde_json::to_string(expected)) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => false,
    }
}

/// The five exercises shipped with the sandbox.
pub fn builtin_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            1,
            "SELECT first_name FROM employees",
            vec![
                row! {"first_name" => "John"},
                row! {"first_name" => "Jane"},
                row! {"first_name" => "Bob"},
                row! {"first_name" => "Alice"},
                row! {"first_name" => "Charlie"},
            ],
        ),
        TestCase::new(
            2,
            "SELECT last_name FROM employees WHERE department_id = 1",
            vec![row! {"last_name" => "Doe"}, row! {"last_name" => "Smith"}],
        ),
        TestCase::new(
            3,
            "SELECT * FROM employees WHERE salary > (SELECT AVG(salary) FROM employees WHERE department_id = employees.department_id)",
            vec![
                row! {
                    "employee_id" => 1,
                    "first_name" => "John",
                    "last_name" => "Doe",
                    "department_id" => 1,
                    "salary" => 120000,
                },
                row! {
                    "employee_id" => 3,
                    "first_name" => "Bob",
                    "last_name" => "Johnson",
                    "department_id" => 2,
                    "salary" => 110000,
                },
            ],
        ),
        TestCase::new(
            4,
            "SELECT department_id, COUNT(*) as num_employees FROM employees GROUP BY department_id",
            vec![
                row! {"department_id" => 1, "num_employees" => 2},
                row! {"department_id" => 2, "num_employees" => 2},
                row! {"department_id" => 3, "num_employees" => 1},
            ],
        ),
        TestCase::new(
            5,
            "SELECT first_name, last_name FROM employees WHERE salary > 100000",
            vec![
                row! {"first_name" => "John", "last_name" => "Doe"},
                row! {"first_name" => "Bob", "last_name" => "Johnson"},
            ],
        ),
    ]
}

/// The ordered set of test cases for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    /// Creates a suite from the given cases, all unchecked.
    pub fn new(cases: Vec<TestCase>) -> Self {
        let mut suite = Self { cases };
        suite.reset();
        suite
    }

    /// The built-in five-case suite.
    pub fn builtin() -> Self {
        Self::new(builtin_test_cases())
    }

    /// Returns the cases in order.
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Returns the passed flag of every case in order.
    pub fn statuses(&self) -> Vec<bool> {
        self.cases.iter().map(|case| case.passed).collect()
    }

    /// Number of passing cases.
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|case| case.passed).count()
    }

    /// Runs every case concurrently and returns the verdicts in case order.
    ///
    /// Does not touch the stored flags; see [`TestSuite::apply`].
    pub async fn evaluate(&self, api: &dyn GatewayApi) -> Vec<bool> {
        let runs = self.cases.iter().map(|case| async move {
            let passed = match api.execute_query(&case.query).await {
                Ok(result) => rows_match(&result.rows, &case.expected),
                Err(e) => {
                    debug!("Test case {} query failed: {}", case.id, e);
                    false
                }
            };
            debug!("Test case {}: {}", case.id, passed);
            passed
        });

        join_all(runs).await
    }

    /// Replaces every flag at once with the given verdicts.
    ///
    /// A verdict list of the wrong length leaves the suite untouched.
    pub fn apply(&mut self, verdicts: &[bool]) {
        if verdicts.len() != self.cases.len() {
            return;
        }
        for (case, passed) in self.cases.iter_mut().zip(verdicts) {
            case.passed = *passed;
        }
    }

    /// Evaluates every case and stores the verdicts.
    pub async fn run_all(&mut self, api: &dyn GatewayApi) {
        let verdicts = self.evaluate(api).await;
        self.apply(&verdicts);
        info!(
            "Test cases: {} of {} passed",
            self.passed_count(),
            self.cases.len()
        );
    }

    /// Marks every case unchecked without executing anything.
    pub fn reset(&mut self) {
        for case in &mut self.cases {
            case.passed = false;
        }
    }
}

impl Default for TestSuite {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{QueryResult, Value};
    use crate::sandbox::MockGateway;

    #[test]
    fn test_builtin_suite_has_five_unchecked_cases() {
        let suite = TestSuite::builtin();
        assert_eq!(suite.cases().len(), 5);
        assert_eq!(suite.statuses(), vec![false; 5]);
        assert_eq!(
            suite.cases().iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_rows_match_is_order_sensitive() {
        let a = vec![row! {"n" => "a"}, row! {"n" => "b"}];
        let b = vec![row! {"n" => "b"}, row! {"n" => "a"}];
        assert!(rows_match(&a, &a.clone()));
        assert!(!rows_match(&a, &b));
    }

    #[test]
    fn test_rows_match_is_column_order_sensitive() {
        let a = vec![row! {"x" => 1, "y" => 2}];
        let b = vec![row! {"y" => 2, "x" => 1}];
        assert!(!rows_match(&a, &b));
    }

    #[test]
    fn test_rows_match_is_type_sensitive() {
        let number = vec![row! {"salary" => 120000}];
        let text = vec![row! {"salary" => "120000"}];
        assert!(!rows_match(&number, &text));
    }

    #[test]
    fn test_rows_match_treats_integral_float_as_number() {
        let float = vec![row! {"avg" => Value::Float(88000.0)}];
        let int = vec![row! {"avg" => 88000}];
        assert!(rows_match(&float, &int));
    }

    #[tokio::test]
    async fn test_run_all_sets_flags_per_case() {
        let gateway = MockGateway::new().with_result(
            "SELECT first_name FROM employees",
            QueryResult {
                rows: builtin_test_cases()[0].expected.clone(),
                message: "5 rows returned".to_string(),
            },
        );

        let mut suite = TestSuite::builtin();
        suite.run_all(&gateway).await;

        assert_eq!(suite.statuses(), vec![true, false, false, false, false]);
        assert_eq!(suite.passed_count(), 1);
        assert_eq!(gateway.executed().len(), 5);
    }

    #[tokio::test]
    async fn test_execution_failure_is_non_match() {
        let gateway = MockGateway::new();
        let suite = TestSuite::new(vec![TestCase::new(9, "SELEC nope", vec![])]);
        assert_eq!(suite.evaluate(&gateway).await, vec![false]);
    }

    #[tokio::test]
    async fn test_reset_after_run_is_all_false() {
        let gateway = MockGateway::new().with_result(
            "SELECT 1",
            QueryResult {
                rows: vec![row! {"1" => 1}],
                message: "1 rows returned".to_string(),
            },
        );
        let mut suite = TestSuite::new(vec![TestCase::new(1, "SELECT 1", vec![row! {"1" => 1}])]);

        suite.run_all(&gateway).await;
        assert_eq!(suite.statuses(), vec![true]);

        suite.reset();
        assert_eq!(suite.statuses(), vec![false]);
    }

    #[test]
    fn test_apply_ignores_mismatched_length() {
        let mut suite = TestSuite::builtin();
        suite.apply(&[true, true]);
        assert_eq!(suite.statuses(), vec![false; 5]);
    }

    #[test]
    fn test_status_label() {
        let mut case = TestCase::new(1, "SELECT 1", vec![]);
        assert_eq!(case.status_label(), "Failed");
        case.passed = true;
        assert_eq!(case.status_label(), "Passed");
    }
}
