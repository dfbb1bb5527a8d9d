//! Attachment routes.
//!
//! Uploads arrive as `multipart/form-data` with a required `file` part and an
//! optional `kind` part. The transport is fully decoded and validated before
//! anything is persisted.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use inventaris_core::AttachmentKind;
use inventaris_db::stores::{AttachmentRow, UploadInput};
use inventaris_shared::AppError;

use crate::response::ApiError;
use crate::AppState;

/// An attachment row with its public download URL.
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    /// The stored row.
    #[serde(flatten)]
    pub row: AttachmentRow,
    /// URL the file is served under.
    pub url: String,
}

impl AttachmentResponse {
    fn new(row: AttachmentRow, base_url: &str) -> Self {
        let url = format!("{base_url}/uploads/{}", row.stored_name);
        Self { row, url }
    }
}

/// The decoded multipart upload form.
struct UploadForm {
    kind: AttachmentKind,
    original_name: String,
    mime_type: Option<String>,
    content: Vec<u8>,
}

/// Drain the multipart stream into an [`UploadForm`].
///
/// Unknown parts are ignored. A missing `file` part or an unknown `kind`
/// value rejects the whole upload.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut kind = AttachmentKind::default();
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable kind field: {e}")))?;
                kind = AttachmentKind::parse(value.trim())
                    .ok_or_else(|| AppError::Validation(format!("unknown kind '{value}'")))?;
            }
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map_or_else(|| "file".to_string(), ToString::to_string);
                let mime_type = field.content_type().map(ToString::to_string);
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable file field: {e}")))?;
                file = Some((original_name, mime_type, content.to_vec()));
            }
            _ => {}
        }
    }

    let (original_name, mime_type, content) =
        file.ok_or_else(|| AppError::Validation("file_required".to_string()))?;

    Ok(UploadForm {
        kind,
        original_name,
        mime_type,
        content,
    })
}

async fn upload_attachment(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AttachmentResponse>), ApiError> {
    let form = read_upload_form(multipart).await?;

    let row = state
        .attachments()
        .upload(UploadInput {
            item_id,
            kind: form.kind,
            original_name: form.original_name,
            mime_type: form.mime_type,
            content: form.content,
        })
        .await?;

    let response = AttachmentResponse::new(row, &state.config.server.base_url);
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_attachments(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<Vec<AttachmentResponse>>, ApiError> {
    let rows = state.attachments().list(item_id).await?;
    let base_url = &state.config.server.base_url;
    Ok(Json(
        rows.into_iter()
            .map(|row| AttachmentResponse::new(row, base_url))
            .collect(),
    ))
}

async fn delete_attachment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if let Some(advisory) = state.attachments().delete(id).await? {
        warn!(attachment_id = id, %advisory, "attachment file not removed");
    }
    Ok(Json(json!({ "ok": true })))
}

/// Creates the attachment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items/{id}/attachments",
            get(list_attachments).post(upload_attachment),
        )
        .route("/attachments/{id}", delete(delete_attachment))
}
