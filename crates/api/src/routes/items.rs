//! Item routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use inventaris_db::stores::{ItemRow, NewItem};

use crate::forms::{blank_as_none, flexible_i64};
use crate::response::ApiError;
use crate::AppState;

/// Request body for creating an item. Numeric fields accept numbers or
/// numeric strings; blank input means absent.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Type reference.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub type_id: Option<i64>,
    /// Size reference.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub size_id: Option<i64>,
    /// Location reference.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub location_id: Option<i64>,
    /// Free-form box number.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub box_no: Option<String>,
    /// Quantity on hand.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub qty: Option<i64>,
    /// Free-form description.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    /// Store the item was bought at.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub store: Option<String>,
    /// Purchase date as entered.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub purchase_date: Option<String>,
    /// Warranty duration in months.
    #[serde(default, deserialize_with = "flexible_i64")]
    pub warranty_months: Option<i64>,
    /// Vendor article number.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub article_no: Option<String>,
    /// Product link.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub link_url: Option<String>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

impl From<CreateItemRequest> for NewItem {
    fn from(payload: CreateItemRequest) -> Self {
        Self {
            label: payload.label,
            type_id: payload.type_id,
            size_id: payload.size_id,
            location_id: payload.location_id,
            box_no: payload.box_no,
            qty: payload.qty,
            description: payload.description,
            store: payload.store,
            purchase_date: payload.purchase_date,
            warranty_months: payload.warranty_months,
            article_no: payload.article_no,
            link_url: payload.link_url,
            notes: payload.notes,
        }
    }
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<ItemRow>>, ApiError> {
    Ok(Json(state.items().list().await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemRow>, ApiError> {
    Ok(Json(state.items().get(id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state.items().create(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let advisories = state.items().delete(id).await?;
    for advisory in &advisories {
        warn!(item_id = id, %advisory, "attachment file not removed");
    }
    Ok(Json(json!({ "ok": true })))
}

/// Creates the item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).delete(delete_item))
}
