//! Health endpoint server.
//!
//! Deployment platforms probe `GET /health`; nothing else is served.

use axum::routing::get;
use axum::Router;
use tracing::info;

/// Build the health router.
pub fn create_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

/// Serve the health endpoint until the process exits.
pub async fn run(port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "health endpoint listening");
    axum::serve(listener, create_router()).await?;
    Ok(())
}
