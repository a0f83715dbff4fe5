//! MySQL integration tests.
//!
//! These tests require a running MySQL server and recreate the `employees`
//! table in it. Set MYSQL_DATABASE_URL to run them.

use pretty_assertions::assert_eq;
use sql_sandbox::db::{apply_seed, DatabaseClient, MySqlClient, StatementOutcome, Value};
use sql_sandbox::gateway;
use sql_sandbox::row;
use sql_sandbox::sandbox::{GatewayClient, TestSuite};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Helper to create a seeded test client.
async fn get_test_client() -> Option<MySqlClient> {
    let url = std::env::var("MYSQL_DATABASE_URL").ok()?;
    let database = url::Url::parse(&url)
        .ok()?
        .path()
        .trim_start_matches('/')
        .to_string();
    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .ok()?;

    let client = MySqlClient::from_pool(pool, database);
    apply_seed(&client).await.ok()?;
    Some(client)
}

#[tokio::test]
async fn test_seeded_tables_and_schema() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: MYSQL_DATABASE_URL not set");
        return;
    };

    assert!(client
        .list_tables()
        .await
        .unwrap()
        .contains(&"employees".to_string()));

    let schema = client.table_schema("employees").await.unwrap();
    let columns: Vec<(&str, &str)> = schema
        .iter()
        .map(|c| (c.name.as_str(), c.data_type.as_str()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("employee_id", "int"),
            ("first_name", "varchar"),
            ("last_name", "varchar"),
            ("department_id", "int"),
            ("salary", "int"),
        ]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_execute_dispatch() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: MYSQL_DATABASE_URL not set");
        return;
    };

    let outcome = client
        .execute("SELECT last_name FROM employees WHERE department_id = 1")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        StatementOutcome::Rows(vec![
            row! {"last_name" => "Doe"},
            row! {"last_name" => "Smith"},
        ])
    );

    let outcome = client
        .execute("UPDATE employees SET salary = salary + 1 WHERE department_id = 2")
        .await
        .unwrap();
    assert_eq!(outcome.message(), "2 rows affected");

    let rows = client
        .fetch_rows("SELECT AVG(salary) AS avg_salary FROM employees WHERE department_id = 1")
        .await
        .unwrap();
    assert_eq!(rows[0].get("avg_salary"), Some(&Value::Float(100000.0)));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_all_test_cases_pass_through_gateway() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: MYSQL_DATABASE_URL not set");
        return;
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(gateway::serve(listener, Arc::new(client)));

    let api = GatewayClient::new(format!("http://{address}")).unwrap();
    let mut suite = TestSuite::builtin();
    suite.run_all(&api).await;

    assert_eq!(suite.statuses(), vec![true; 5]);
}
