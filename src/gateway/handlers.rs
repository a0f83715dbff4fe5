//! Endpoint handlers.
//!
//! Each handler makes exactly one database call and wraps the outcome. Any
//! failure, including an unreadable request body, becomes a 400 carrying the
//! underlying message.

use super::protocol::{Envelope, ErrorBody, ExecuteRequest, TableRequest};
use super::GatewayState;
use crate::db::{ColumnDescriptor, QueryResult, Row};
use crate::error::{Result, SandboxError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

impl IntoResponse for SandboxError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| SandboxError::query(rejection.body_text()))
}

/// `GET /tables`
pub async fn list_tables(State(state): State<GatewayState>) -> Result<Json<Envelope<Vec<String>>>> {
    let tables = state.db.list_tables().await.inspect_err(|e| {
        warn!("Failed to list tables: {}", e);
    })?;

    debug!("Listed {} tables", tables.len());
    Ok(Json(Envelope::new("Tables fetched successfully", tables)))
}

/// `POST /table-schema`
pub async fn table_schema(
    State(state): State<GatewayState>,
    payload: std::result::Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<ColumnDescriptor>>>> {
    let TableRequest { table_name } = body(payload)?;

    let columns = state.db.table_schema(&table_name).await.inspect_err(|e| {
        warn!("Failed to fetch schema for {}: {}", table_name, e);
    })?;

    Ok(Json(Envelope::new(
        format!("Schema fetched successfully for table {table_name}"),
        columns,
    )))
}

/// `POST /table-data`
pub async fn table_data(
    State(state): State<GatewayState>,
    payload: std::result::Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Row>>>> {
    let TableRequest { table_name } = body(payload)?;

    let rows = state.db.table_data(&table_name).await.inspect_err(|e| {
        warn!("Failed to fetch data from {}: {}", table_name, e);
    })?;

    Ok(Json(Envelope::new(
        format!("Data fetched successfully from {table_name}"),
        rows,
    )))
}

/// `POST /execute-query`
pub async fn execute_query(
    State(state): State<GatewayState>,
    payload: std::result::Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<QueryResult>> {
    let ExecuteRequest { query } = body(payload)?;

    let outcome = state.db.execute(&query).await.inspect_err(|e| {
        warn!("Query failed: {}", e);
    })?;

    let result = outcome.into_result();
    debug!("Query succeeded: {}", result.message);
    Ok(Json(result))
}
