//! Database layer for Inventaris.
//!
//! This crate provides:
//! - The bounded connection pool
//! - Idempotent schema reconciliation
//! - Entity stores for lookups, items, boxes, and attachments

pub mod reconcile;
pub mod stores;

pub use reconcile::{ReconcileReport, reconcile};
pub use stores::{AttachmentStore, BoxStore, ItemStore, LookupKind, LookupStore};

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use inventaris_shared::config::DatabaseConfig;
use inventaris_shared::{AppError, AppResult};

/// Establishes the bounded connection pool.
///
/// The database file is created if missing and foreign key enforcement is
/// switched on for every connection (it is per-connection in SQLite).
/// Acquisition beyond the configured timeout surfaces as a transient error.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database cannot be opened.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::Database(format!("invalid database url: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    Ok(pool)
}
