//! Axum web interface: dashboard page, prediction API, static data mount.

pub mod page;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use anyhow::{Context, Result};
use tracing::info;

/// Binds `address:port` and serves until Ctrl+C.
pub async fn serve(state: AppState) -> Result<()> {
    let address = format!(
        "{}:{}",
        state.config.server.bind_address, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(%address, "HTTP server listening");
    info!("Metrics endpoint available at http://{}/metrics", address);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server failed")
}
