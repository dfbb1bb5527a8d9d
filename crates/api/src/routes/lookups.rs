//! Lookup table routes.
//!
//! The three lookup tables share one set of handlers, parametrized by the
//! closed [`LookupKind`] enum. URLs never reach the SQL layer as table names.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use inventaris_db::stores::{LookupKind, LookupRow};

use crate::response::ApiError;
use crate::AppState;

/// Request body for creating a lookup row.
#[derive(Debug, Deserialize)]
pub struct CreateLookupRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
}

async fn list(state: &AppState, kind: LookupKind) -> Result<Json<Vec<LookupRow>>, ApiError> {
    Ok(Json(state.lookups().list(kind).await?))
}

async fn create(
    state: &AppState,
    kind: LookupKind,
    payload: CreateLookupRequest,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state.lookups().create(kind, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn remove(state: &AppState, kind: LookupKind, id: i64) -> Result<Json<Value>, ApiError> {
    state.lookups().delete(kind, id).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn list_types(State(state): State<AppState>) -> Result<Json<Vec<LookupRow>>, ApiError> {
    list(&state, LookupKind::Types).await
}

async fn create_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateLookupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    create(&state, LookupKind::Types, payload).await
}

async fn delete_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, LookupKind::Types, id).await
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<LookupRow>>, ApiError> {
    list(&state, LookupKind::Locations).await
}

async fn create_location(
    State(state): State<AppState>,
    Json(payload): Json<CreateLookupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    create(&state, LookupKind::Locations, payload).await
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, LookupKind::Locations, id).await
}

async fn list_sizes(State(state): State<AppState>) -> Result<Json<Vec<LookupRow>>, ApiError> {
    list(&state, LookupKind::Sizes).await
}

async fn create_size(
    State(state): State<AppState>,
    Json(payload): Json<CreateLookupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    create(&state, LookupKind::Sizes, payload).await
}

async fn delete_size(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, LookupKind::Sizes, id).await
}

/// Creates the lookup table routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(list_types).post(create_type))
        .route("/types/{id}", delete(delete_type))
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/{id}", delete(delete_location))
        .route("/sizes", get(list_sizes).post(create_size))
        .route("/sizes/{id}", delete(delete_size))
}
