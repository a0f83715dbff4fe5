//! PostgreSQL integration tests.
//!
//! These tests require a running PostgreSQL database and recreate the
//! `employees` table in it. Set DATABASE_URL to run them.

use pretty_assertions::assert_eq;
use sql_sandbox::db::{apply_seed, DatabaseClient, PostgresClient, Value};
use sql_sandbox::row;
use sqlx::postgres::PgPoolOptions;

/// Helper to create a seeded test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let database = url::Url::parse(&url)
        .ok()?
        .path()
        .trim_start_matches('/')
        .to_string();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .ok()?;

    let client = PostgresClient::from_pool(pool, database);
    apply_seed(&client).await.ok()?;
    Some(client)
}

#[tokio::test]
async fn test_seeded_schema_in_column_order() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert!(client
        .list_tables()
        .await
        .unwrap()
        .contains(&"employees".to_string()));

    let names: Vec<String> = client
        .table_schema("employees")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(
        names,
        vec!["employee_id", "first_name", "last_name", "department_id", "salary"]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_table_data_and_counts() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = client.table_data("employees").await.unwrap();
    assert_eq!(rows.len(), 5);

    let rows = client
        .fetch_rows("SELECT COUNT(*) AS n FROM employees WHERE salary > 100000")
        .await
        .unwrap();
    assert_eq!(rows, vec![row! {"n" => 2}]);

    let affected = client
        .execute_statement("DELETE FROM employees WHERE department_id = 3")
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = client
        .fetch_rows("SELECT NULL::text AS nothing")
        .await
        .unwrap();
    assert_eq!(rows[0].get("nothing"), Some(&Value::Null));

    client.close().await.unwrap();
}
