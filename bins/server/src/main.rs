//! Inventaris API Server
//!
//! Main entry point for the inventory backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventaris_api::{create_router, AppState};
use inventaris_core::{inventory_schema, BlobStore};
use inventaris_db::{connect, reconcile};
use inventaris_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventaris=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration: {e}"))?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!(url = %config.database.url, "Connected to database");

    // Bring the schema up to the declared shape. Missing baseline tables are
    // fatal; everything else degrades to advisories.
    let report = reconcile(&db, &inventory_schema()).await?;
    for advisory in &report.advisories {
        debug!(%advisory, "schema reconciliation advisory");
    }
    info!(advisories = report.advisories.len(), "Schema reconciled");

    // Open the attachment blob store
    let blobs = BlobStore::open(&config.uploads.dir)
        .map_err(|e| anyhow::anyhow!("blob store: {e}"))?;
    info!(dir = %config.uploads.dir, "Upload directory ready");

    // Create application state
    let state = AppState {
        db,
        blobs: Arc::new(blobs),
        config: Arc::new(config.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(base_url = %config.server.base_url, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
