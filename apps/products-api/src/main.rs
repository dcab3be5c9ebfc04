//! Products API - product catalog REST server

use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::init_db;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    if config.database.is_in_memory() {
        info!("Using in-memory SQLite store; data is lost on exit");
    }
    let db = init_db(&config.database).await?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    let app = api::app(&state).await?;

    info!(
        "Starting {} v{} on {}",
        config.app.name,
        config.app.version,
        config.server.address()
    );

    let db = state.db.clone();
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database pool");
        if let Err(e) = db.close().await {
            tracing::warn!("Error closing database pool: {}", e);
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
