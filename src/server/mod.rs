//! HTTP server for neighbourly
//!
//! Provides REST API endpoints for neighbourhood resolution.

pub mod routes;
pub mod state;

use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serve `state` on its configured address until Ctrl-C
///
/// Build the state with `AppState::new` first; a bad taxonomy or geocoder
/// configuration then fails before anything is bound.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = state
        .config
        .server_addr()
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}
