//! Gateway endpoint tests.
//!
//! Drives the axum router in-process against a seeded in-memory SQLite
//! database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sql_sandbox::db::{
    apply_seed, DatabaseBackend, DatabaseClient, SqliteClient, UnavailableClient,
};
use sql_sandbox::error::SandboxError;
use sql_sandbox::gateway::router;
use std::sync::Arc;
use tower::ServiceExt;

async fn seeded_db() -> Arc<SqliteClient> {
    let db = SqliteClient::in_memory().await.unwrap();
    apply_seed(&db).await.unwrap();
    Arc::new(db)
}

async fn seeded_router() -> Router {
    router(seeded_db().await)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_list_tables() {
    let (status, body) = send(seeded_router().await, get("/tables")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Tables fetched successfully", "data": ["employees"]})
    );
}

#[tokio::test]
async fn test_table_schema_in_column_order() {
    let (status, body) = send(
        seeded_router().await,
        post("/table-schema", json!({"tableName": "employees"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Schema fetched successfully for table employees"
    );
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["employee_id", "first_name", "last_name", "department_id", "salary"]
    );
    assert!(body["data"][0]["dataType"].is_string());
}

#[tokio::test]
async fn test_unknown_table_schema_is_empty() {
    let (status, body) = send(
        seeded_router().await,
        post("/table-schema", json!({"tableName": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_table_data() {
    let (status, body) = send(
        seeded_router().await,
        post("/table-data", json!({"tableName": "employees"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data fetched successfully from employees");
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["data"][0],
        json!({
            "employee_id": 1,
            "first_name": "John",
            "last_name": "Doe",
            "department_id": 1,
            "salary": 120000
        })
    );
}

#[tokio::test]
async fn test_table_data_for_missing_table_is_400() {
    let (status, body) = send(
        seeded_router().await,
        post("/table-data", json!({"tableName": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn test_table_name_is_quoted_not_interpolated() {
    let db = seeded_db().await;

    let (status, body) = send(
        router(db.clone()),
        post(
            "/table-data",
            json!({"tableName": "employees; DROP TABLE employees"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // The table is still there.
    let (status, body) = send(router(db), get("/tables")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["employees"]));
}

#[tokio::test]
async fn test_execute_select() {
    let (status, body) = send(
        seeded_router().await,
        post(
            "/execute-query",
            json!({"query": "SELECT first_name FROM employees"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [
                {"first_name": "John"},
                {"first_name": "Jane"},
                {"first_name": "Bob"},
                {"first_name": "Alice"},
                {"first_name": "Charlie"}
            ],
            "message": "5 rows returned"
        })
    );
}

#[tokio::test]
async fn test_execute_select_with_filter() {
    let (_, body) = send(
        seeded_router().await,
        post(
            "/execute-query",
            json!({"query": "SELECT last_name FROM employees WHERE department_id = 1"}),
        ),
    )
    .await;

    assert_eq!(
        body["data"],
        json!([{"last_name": "Doe"}, {"last_name": "Smith"}])
    );
    assert_eq!(body["message"], "2 rows returned");
}

#[tokio::test]
async fn test_execute_lowercase_select_returns_rows() {
    let (_, body) = send(
        seeded_router().await,
        post(
            "/execute-query",
            json!({"query": "   select count(*) as n from employees"}),
        ),
    )
    .await;

    assert_eq!(body, json!({"data": [{"n": 5}], "message": "1 rows returned"}));
}

#[tokio::test]
async fn test_execute_update_reports_affected_rows() {
    let db = seeded_db().await;

    let (status, body) = send(
        router(db.clone()),
        post(
            "/execute-query",
            json!({"query": "UPDATE employees SET salary = salary + 1 WHERE department_id = 2"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": [], "message": "2 rows affected"}));

    // The mutation is visible to later requests.
    let (_, body) = send(
        router(db),
        post(
            "/execute-query",
            json!({"query": "SELECT salary FROM employees WHERE employee_id = 3"}),
        ),
    )
    .await;
    assert_eq!(body["data"], json!([{"salary": 110001}]));
}

#[tokio::test]
async fn test_ddl_after_update_reports_zero_affected() {
    let db = seeded_db().await;

    let (_, body) = send(
        router(db.clone()),
        post(
            "/execute-query",
            json!({"query": "UPDATE employees SET salary = salary + 1 WHERE department_id = 1"}),
        ),
    )
    .await;
    assert_eq!(body["message"], "2 rows affected");

    let (status, body) = send(
        router(db),
        post("/execute-query", json!({"query": "CREATE TABLE scratch (x INT)"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": [], "message": "0 rows affected"}));
}

#[tokio::test]
async fn test_execute_invalid_sql_is_400() {
    let (status, body) = send(
        seeded_router().await,
        post("/execute-query", json!({"query": "SELEC * FROM employees"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_select_statement_gets_affected_message() {
    // Only statements starting with SELECT are treated as row-returning.
    let (status, body) = send(
        seeded_router().await,
        post(
            "/execute-query",
            json!({"query": "WITH t AS (SELECT 1) SELECT * FROM t"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert!(body["message"].as_str().unwrap().ends_with("rows affected"));
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/execute-query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(seeded_router().await, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_field_is_400() {
    let (status, body) = send(
        seeded_router().await,
        post("/table-data", json!({"table": "employees"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/tables")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = seeded_router().await.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_unavailable_database_fails_every_request() {
    let db: Arc<dyn DatabaseClient> = Arc::new(UnavailableClient::new(
        DatabaseBackend::MySql,
        SandboxError::connection("connect ECONNREFUSED"),
    ));

    for request in [
        get("/tables"),
        post("/table-schema", json!({"tableName": "employees"})),
        post("/table-data", json!({"tableName": "employees"})),
        post("/execute-query", json!({"query": "SELECT 1"})),
    ] {
        let (status, body) = send(router(Arc::clone(&db)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "connect ECONNREFUSED"}));
    }
}
