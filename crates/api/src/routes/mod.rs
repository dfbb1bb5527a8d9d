//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod attachments;
pub mod boxes;
pub mod health;
pub mod items;
pub mod lookups;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(lookups::routes())
        .merge(items::routes())
        .merge(boxes::routes())
        .merge(attachments::routes())
}
