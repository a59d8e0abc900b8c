//! HTTP server wiring for the upload and query endpoints
//!
//! The server exposes:
//! - POST /upload  - multipart legacy file ingestion
//! - GET  /orders  - query by order id and/or date range
//! - GET  /health  - liveness probe

pub mod handlers;
pub mod router;

pub use handlers::AppState;
pub use router::build_router;

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::core::store::OrderStore;

/// Serve the application with graceful shutdown
///
/// Binds the configured address, serves requests, and handles SIGTERM and
/// SIGINT (Ctrl+C) for graceful shutdown.
pub async fn serve(config: &ServerConfig, store: Arc<dyn OrderStore>) -> Result<()> {
    let app = build_router(AppState { store });
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for either Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
