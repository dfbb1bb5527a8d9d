//! Box and box-content routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use inventaris_db::stores::{BoxItemRow, BoxRow, NewBox, NewBoxItem};

use crate::forms::{blank_as_none, flexible_i64};
use crate::response::ApiError;
use crate::AppState;

/// Request body for creating a box.
#[derive(Debug, Deserialize)]
pub struct CreateBoxRequest {
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Location reference.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub location_id: Option<i64>,
}

/// Request body for adding a content line to a box.
#[derive(Debug, Deserialize)]
pub struct CreateBoxItemRequest {
    /// Content name.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    /// Quantity.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub qty: Option<i64>,
}

async fn list_boxes(State(state): State<AppState>) -> Result<Json<Vec<BoxRow>>, ApiError> {
    Ok(Json(state.boxes().list().await?))
}

async fn create_box(
    State(state): State<AppState>,
    Json(payload): Json<CreateBoxRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state
        .boxes()
        .create(&NewBox {
            label: payload.label,
            location_id: payload.location_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn delete_box(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.boxes().delete(id).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn list_box_items(
    State(state): State<AppState>,
    Path(box_id): Path<i64>,
) -> Result<Json<Vec<BoxItemRow>>, ApiError> {
    Ok(Json(state.boxes().list_items(box_id).await?))
}

async fn create_box_item(
    State(state): State<AppState>,
    Path(box_id): Path<i64>,
    Json(payload): Json<CreateBoxItemRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state
        .boxes()
        .create_item(
            box_id,
            &NewBoxItem {
                name: payload.name.unwrap_or_default(),
                qty: payload.qty,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn delete_box_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.boxes().delete_item(id).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Creates the box routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boxes", get(list_boxes).post(create_box))
        .route("/boxes/{id}", delete(delete_box))
        .route(
            "/boxes/{id}/items",
            get(list_box_items).post(create_box_item),
        )
        .route("/box-items/{id}", delete(delete_box_item))
}
