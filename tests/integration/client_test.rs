//! Sandbox client tests over real HTTP.
//!
//! Serves the gateway on an ephemeral local port, backed by a seeded
//! in-memory SQLite database, and drives it with `GatewayClient`.

use pretty_assertions::assert_eq;
use sql_sandbox::db::{apply_seed, SqliteClient};
use sql_sandbox::error::SandboxError;
use sql_sandbox::gateway;
use sql_sandbox::sandbox::{run_check, EditorState, GatewayApi, GatewayClient, ReferenceData, TestSuite};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Starts a seeded gateway and returns a client pointed at it.
async fn start_gateway() -> GatewayClient {
    let db = SqliteClient::in_memory().await.unwrap();
    apply_seed(&db).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(gateway::serve(listener, Arc::new(db)));

    GatewayClient::new(format!("http://{address}")).unwrap()
}

#[tokio::test]
async fn test_all_test_cases_pass_against_seed_data() {
    let client = start_gateway().await;
    let mut suite = TestSuite::builtin();

    suite.run_all(&client).await;

    assert_eq!(suite.statuses(), vec![true; 5]);
}

#[tokio::test]
async fn test_reset_after_run_is_all_false() {
    let client = start_gateway().await;
    let mut suite = TestSuite::builtin();

    suite.run_all(&client).await;
    suite.reset();

    assert_eq!(suite.statuses(), vec![false; 5]);
}

#[tokio::test]
async fn test_mutation_can_break_test_cases() {
    let client = start_gateway().await;
    let mut editor = EditorState::new();

    let ok = editor
        .execute(&client, "DELETE FROM employees WHERE employee_id = 5", |_| {})
        .await;
    assert!(ok);
    assert_eq!(editor.message, "1 rows affected");
    assert!(editor.rows.is_empty());

    let mut suite = TestSuite::builtin();
    suite.run_all(&client).await;

    // Charlie is gone, and department 3 no longer has anyone.
    assert_eq!(suite.statuses(), vec![false, true, true, false, true]);
}

#[tokio::test]
async fn test_query_error_carries_server_text() {
    let client = start_gateway().await;

    let err = client
        .execute_query("SELECT * FROM missing_table")
        .await
        .unwrap_err();

    match err {
        SandboxError::Query(message) => assert!(message.contains("no such table")),
        other => panic!("expected query error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reference_data_loads_every_table() {
    let client = start_gateway().await;

    let data = ReferenceData::load(&client, "employees").await;

    assert!(data.is_complete());
    assert_eq!(data.columns().len(), 5);
    let tables: Vec<(&str, usize)> = data
        .loaded_tables()
        .map(|(name, rows)| (name, rows.len()))
        .collect();
    assert_eq!(tables, vec![("employees", 5)]);
}

#[tokio::test]
async fn test_check_report() {
    let client = start_gateway().await;
    let mut out = Vec::new();

    let all_passed = run_check(&client, Some("SELECT COUNT(*) AS n FROM employees"), &mut out)
        .await
        .unwrap();
    let report = String::from_utf8(out).unwrap();

    assert!(all_passed);
    assert_eq!(
        report,
        "1 rows returned\n  n=5\n\
         Testcase 1: Passed\nTestcase 2: Passed\nTestcase 3: Passed\n\
         Testcase 4: Passed\nTestcase 5: Passed\n"
    );
}

#[tokio::test]
async fn test_gateway_down_is_network_error() {
    // Bind and drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = GatewayClient::new(format!("http://{address}")).unwrap();
    assert_eq!(
        client.list_tables().await.unwrap_err(),
        SandboxError::network("Error fetching initial table data")
    );
}
