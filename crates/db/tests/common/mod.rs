//! Shared helpers for database integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;

use inventaris_core::{inventory_schema, BlobStore};
use inventaris_shared::config::DatabaseConfig;

/// A pooled file-backed database in a temp directory. The directory guard
/// must stay alive for the duration of the test.
pub async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}/test.db", dir.path().display()),
        max_connections: 5,
        acquire_timeout_secs: 10,
    };
    let pool = inventaris_db::connect(&config).await.expect("pool connects");
    (dir, pool)
}

/// A pool with the inventory schema already reconciled.
pub async fn reconciled_pool() -> (TempDir, SqlitePool) {
    let (dir, pool) = test_pool().await;
    inventaris_db::reconcile(&pool, &inventory_schema())
        .await
        .expect("reconcile succeeds");
    (dir, pool)
}

/// A blob store under `uploads/` in the same temp directory.
pub fn blob_store(dir: &TempDir) -> Arc<BlobStore> {
    Arc::new(BlobStore::open(dir.path().join("uploads")).expect("blob store opens"))
}

/// Number of files currently in the upload directory.
pub fn upload_count(dir: &TempDir) -> usize {
    match std::fs::read_dir(dir.path().join("uploads")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}
