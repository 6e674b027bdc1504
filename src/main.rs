//! # Inventory Service
//!
//! Entry point: loads [`Settings`], opens the SQLite store, starts the item actor
//! and serves the REST API until Ctrl-C.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! INVENTORY__SERVER__PORT=9000 INVENTORY__DATABASE__PATH=:memory: cargo run
//! ```

use std::sync::Arc;

use inventory_service::config::Settings;
use inventory_service::http::{build_router, AppState};
use inventory_service::inventory_actor::LogNotifier;
use inventory_service::lifecycle::{setup_tracing, InventorySystem};
use inventory_service::store::SqliteRepository;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let settings = Settings::load().map_err(|e| e.to_string())?;
    info!(?settings, "Starting inventory service");

    let store = SqliteRepository::open(&settings.database.path).map_err(|e| e.to_string())?;
    let system = InventorySystem::start(settings.runtime.buffer_size, store, Arc::new(LogNotifier));

    let app = build_router(AppState::new(system.client.clone()));
    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| e.to_string())?;
    info!(%address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    // The router and its client clones are gone; the actor can drain and stop.
    system.shutdown().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
