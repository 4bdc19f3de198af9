//! Read API serving previously synced repositories as JSON.
//!
//! A single route, `GET /repos`, returns every row of the relational store.
//! Failures are logged and reported to the caller as a bare 500.
//!
//! # Example
//!
//! ```ignore
//! use repomirror::api::{ServerConfig, serve};
//!
//! let config = ServerConfig::default();
//! let listener = config.bind().await?;
//! serve(listener, store, &config.env, shutdown_signal()).await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;

use crate::store::RelationalStore;

/// Default port for the read API.
pub const DEFAULT_PORT: u16 = 5555;

/// Body returned on any failure.
pub const FETCH_ERROR_BODY: &str = "error fetching repos";

/// Where and as what the read API runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Environment label (development, staging, production). Only logged.
    pub env: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Loopback address for the configured port.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    /// Bind the listener.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.addr()).await
    }
}

/// Build the router over a relational store.
pub fn router(store: RelationalStore) -> Router {
    Router::new()
        .route("/repos", get(list_repos))
        .with_state(Arc::new(store))
}

async fn list_repos(State(store): State<Arc<RelationalStore>>) -> Response {
    match store.select_all().await {
        Ok(repos) => Json(repos).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch repos");
            (StatusCode::INTERNAL_SERVER_ERROR, FETCH_ERROR_BODY).into_response()
        }
    }
}

/// Serve the read API until `shutdown` resolves, then drain in-flight
/// requests.
pub async fn serve<F>(
    listener: TcpListener,
    store: RelationalStore,
    env: &str,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Starting {} server on http://{}", env, addr);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server exited gracefully");
    Ok(())
}
