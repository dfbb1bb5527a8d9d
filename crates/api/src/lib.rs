//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the entity and attachment stores
//! - Static serving of the UI and the upload directory
//! - Error response mapping

pub mod forms;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use inventaris_core::BlobStore;
use inventaris_db::{AttachmentStore, BoxStore, ItemStore, LookupStore};
use inventaris_shared::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,
    /// Blob store backing attachment files.
    pub blobs: Arc<BlobStore>,
    /// Application configuration, constructed once at startup.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Lookup table store.
    #[must_use]
    pub fn lookups(&self) -> LookupStore {
        LookupStore::new(self.db.clone())
    }

    /// Item store.
    #[must_use]
    pub fn items(&self) -> ItemStore {
        ItemStore::new(self.db.clone(), Arc::clone(&self.blobs))
    }

    /// Box store.
    #[must_use]
    pub fn boxes(&self) -> BoxStore {
        BoxStore::new(self.db.clone())
    }

    /// Attachment store.
    #[must_use]
    pub fn attachments(&self) -> AttachmentStore {
        AttachmentStore::new(
            self.db.clone(),
            Arc::clone(&self.blobs),
            self.config.uploads.max_file_size,
        )
    }
}

/// Creates the main application router.
///
/// The API is mounted at `/api`, the upload directory at `/uploads`, and the
/// static UI everywhere else. When an ingress prefix is configured the whole
/// tree is nested under it.
pub fn create_router(state: AppState) -> Router {
    let serve_uploads = ServeDir::new(state.blobs.root());
    let serve_web = ServeDir::new(&state.config.server.web_dir);
    let base_url = state.config.server.base_url.clone();

    // Leave some headroom above the raw file ceiling for multipart framing.
    let body_limit = usize::try_from(state.config.uploads.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .nest_service("/uploads", serve_uploads)
        .fallback_service(serve_web)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    if base_url.is_empty() {
        app
    } else {
        Router::new().nest(&base_url, app)
    }
}
