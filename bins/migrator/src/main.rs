//! Standalone schema reconciliation runner.
//!
//! Applies the same idempotent reconciliation the server performs at boot,
//! then exits. Useful for preparing a database ahead of deployment or for
//! inspecting advisories without starting the service.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventaris_core::inventory_schema;
use inventaris_db::{connect, reconcile};
use inventaris_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventaris=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration: {e}"))?;

    let db = connect(&config.database).await?;
    info!(url = %config.database.url, "Connected to database");

    let report = reconcile(&db, &inventory_schema()).await?;
    for advisory in &report.advisories {
        warn!(%advisory, "schema reconciliation advisory");
    }

    if report.is_clean() {
        info!("Schema reconciled cleanly");
    } else {
        info!(
            advisories = report.advisories.len(),
            "Schema reconciled with advisories"
        );
    }

    Ok(())
}
