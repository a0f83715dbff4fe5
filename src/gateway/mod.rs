//! The query gateway: a small HTTP surface over one database handle.
//!
//! The gateway performs no query interpretation. It forwards table names and
//! SQL text to the injected `DatabaseClient` and reports results as JSON.

mod handlers;
pub mod protocol;

use crate::config::GatewayConfig;
use crate::db::DatabaseClient;
use crate::error::{Result, SandboxError};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Router state shared by every handler.
#[derive(Clone)]
pub struct GatewayState {
    db: Arc<dyn DatabaseClient>,
}

/// Builds the gateway router around a database handle.
pub fn router(db: Arc<dyn DatabaseClient>) -> Router {
    Router::new()
        .route("/tables", get(handlers::list_tables))
        .route("/table-schema", post(handlers::table_schema))
        .route("/table-data", post(handlers::table_data))
        .route("/execute-query", post(handlers::execute_query))
        .layer(CorsLayer::permissive())
        .with_state(GatewayState { db })
}

/// Serves the gateway on an already-bound listener until the future is dropped.
pub async fn serve(listener: TcpListener, db: Arc<dyn DatabaseClient>) -> Result<()> {
    axum::serve(listener, router(db))
        .await
        .map_err(|e| SandboxError::internal(format!("Server error: {e}")))
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn run(config: &GatewayConfig, db: Arc<dyn DatabaseClient>) -> Result<()> {
    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| SandboxError::config(format!("Failed to bind {address}: {e}")))?;

    info!("Server is running on http://localhost:{}", config.port());

    axum::serve(listener, router(Arc::clone(&db)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SandboxError::internal(format!("Server error: {e}")))?;

    info!("Shutting down");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
