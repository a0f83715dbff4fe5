//! HTTP client for the query gateway.
//!
//! The `GatewayApi` trait is the seam between the sandbox logic and the
//! network, so the editor, reference loader and test runner can be driven by
//! an in-process fake in tests.

use crate::db::{ColumnDescriptor, QueryResult, Row};
use crate::error::{Result, SandboxError};
use crate::gateway::protocol::{Envelope, ErrorBody, ExecuteRequest, TableRequest};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Message shown when table loading fails without a server-supplied error.
const TABLE_DATA_FALLBACK: &str = "Error fetching initial table data";

/// Message shown when the schema fetch fails without a server-supplied error.
const SCHEMA_FALLBACK: &str = "Error fetching table schema";

/// Message shown when a query fails without a server-supplied error.
const EXECUTE_FALLBACK: &str = "Error executing query";

/// Operations the sandbox needs from the gateway.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// `GET /tables`
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// `POST /table-schema`
    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// `POST /table-data`
    async fn table_data(&self, table: &str) -> Result<Vec<Row>>;

    /// `POST /execute-query`
    async fn execute_query(&self, query: &str) -> Result<QueryResult>;
}

/// reqwest-backed gateway client.
///
/// Requests carry no timeout and are never retried.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    client: Client,
}

impl GatewayClient {
    /// Creates a client for the gateway at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SandboxError::network(format!("Failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    /// Returns the gateway base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, fallback))?;
        read_response(response, fallback).await
    }
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        debug!("GET /tables");
        let response = self
            .client
            .get(self.url("/tables"))
            .send()
            .await
            .map_err(|e| transport_error(e, TABLE_DATA_FALLBACK))?;

        let envelope: Envelope<Vec<String>> =
            read_response(response, TABLE_DATA_FALLBACK).await?;
        Ok(envelope.data)
    }

    async fn table_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let request = TableRequest {
            table_name: table.to_string(),
        };
        let envelope: Envelope<Vec<ColumnDescriptor>> =
            self.post("/table-schema", &request, SCHEMA_FALLBACK).await?;
        Ok(envelope.data)
    }

    async fn table_data(&self, table: &str) -> Result<Vec<Row>> {
        let request = TableRequest {
            table_name: table.to_string(),
        };
        let envelope: Envelope<Vec<Row>> =
            self.post("/table-data", &request, TABLE_DATA_FALLBACK).await?;
        Ok(envelope.data)
    }

    async fn execute_query(&self, query: &str) -> Result<QueryResult> {
        let request = ExecuteRequest {
            query: query.to_string(),
        };
        self.post("/execute-query", &request, EXECUTE_FALLBACK).await
    }
}

fn transport_error(error: reqwest::Error, fallback: &str) -> SandboxError {
    warn!("Gateway request failed: {}", error);
    SandboxError::network(fallback)
}

/// Decodes a success body, or turns an error response into a `SandboxError`.
///
/// A response carrying `{ error }` yields a query error with the server's
/// text; anything else yields the generic fallback.
async fn read_response<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            warn!("Malformed gateway response: {}", e);
            SandboxError::network(fallback)
        });
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => Err(SandboxError::query(body.error)),
        Err(_) => {
            warn!("Gateway returned {} without an error body", status);
            Err(SandboxError::network(fallback))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GatewayClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(client.url("/tables"), "http://localhost:3001/tables");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_network_error() {
        // Port 1 is reserved and refuses connections.
        let client = GatewayClient::new("http://127.0.0.1:1").unwrap();
        let err = client.execute_query("SELECT 1").await.unwrap_err();
        assert_eq!(err, SandboxError::network("Error executing query"));
    }
}
