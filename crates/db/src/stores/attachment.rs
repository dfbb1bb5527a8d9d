//! Attachment store.
//!
//! Keeps filesystem blobs and database rows consistent across the two-step
//! operations: a file is written before its row is inserted, and a row is
//! deleted before its file is removed. Readers therefore never observe a row
//! whose file is still pending.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use inventaris_core::naming::stored_name;
use inventaris_core::{AdvisoryFailure, AttachmentKind, BlobStore};
use inventaris_shared::{AppError, AppResult};

/// An attachment row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AttachmentRow {
    /// Unique identifier.
    pub id: i64,
    /// Owning item.
    pub item_id: i64,
    /// Attachment kind (`receipt` or `manual`).
    pub kind: String,
    /// Generated on-disk filename.
    pub stored_name: String,
    /// Filename as uploaded.
    pub original_name: Option<String>,
    /// MIME type as uploaded.
    pub mime_type: Option<String>,
    /// Content size in bytes.
    pub size_bytes: Option<i64>,
    /// Server-assigned creation timestamp.
    pub created_at: NaiveDateTime,
}

/// An upload, already decoded from the transport.
#[derive(Debug)]
pub struct UploadInput {
    /// Owning item.
    pub item_id: i64,
    /// Validated attachment kind.
    pub kind: AttachmentKind,
    /// Filename as uploaded.
    pub original_name: String,
    /// MIME type as uploaded.
    pub mime_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

const SELECT_SQL: &str = "SELECT id, item_id, kind, stored_name, original_name, \
                          mime_type, size_bytes, created_at FROM attachments";

/// Store for attachment rows and their backing blobs.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    pool: SqlitePool,
    blobs: Arc<BlobStore>,
    max_file_size: u64,
}

impl AttachmentStore {
    /// Create a new attachment store.
    #[must_use]
    pub fn new(pool: SqlitePool, blobs: Arc<BlobStore>, max_file_size: u64) -> Self {
        Self {
            pool,
            blobs,
            max_file_size,
        }
    }

    /// Persist an upload: size gate, parent check, blob write, row insert.
    ///
    /// If the insert fails after the blob was written, the blob is removed
    /// best-effort so a failed upload leaves no orphan file behind.
    pub async fn upload(&self, input: UploadInput) -> AppResult<AttachmentRow> {
        let size = input.content.len() as u64;
        if size > self.max_file_size {
            return Err(AppError::Validation(format!(
                "file of {size} bytes exceeds maximum of {} bytes",
                self.max_file_size
            )));
        }

        if !self.item_exists(input.item_id).await? {
            return Err(AppError::NotFound(format!("item {}", input.item_id)));
        }

        let name = stored_name(Utc::now(), &input.original_name);
        self.blobs
            .write(&name, input.content)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let inserted = sqlx::query(
            "INSERT INTO attachments (item_id, kind, stored_name, original_name, mime_type, size_bytes) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(input.item_id)
        .bind(input.kind.as_str())
        .bind(&name)
        .bind(&input.original_name)
        .bind(&input.mime_type)
        .bind(i64::try_from(size).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await;

        let result = match inserted {
            Ok(result) => result,
            Err(e) => {
                if let Some(advisory) = self.blobs.remove_quietly(&name).await {
                    tracing::debug!(%advisory, "cleanup after failed attachment insert");
                }
                return Err(e.into());
            }
        };

        let row = sqlx::query_as::<_, AttachmentRow>(&format!("{SELECT_SQL} WHERE id = ?"))
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// List an item's attachments, newest-first.
    pub async fn list(&self, item_id: i64) -> AppResult<Vec<AttachmentRow>> {
        Ok(
            sqlx::query_as::<_, AttachmentRow>(&format!(
                "{SELECT_SQL} WHERE item_id = ? ORDER BY id DESC"
            ))
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?,
        )
    }

    /// Delete an attachment by id: row first, then the blob best-effort.
    ///
    /// The row deletion is the authoritative outcome; a file that is already
    /// gone comes back as an advisory at most. Absent ids succeed.
    pub async fn delete(&self, id: i64) -> AppResult<Option<AdvisoryFailure>> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT stored_name FROM attachments WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(self.blobs.remove_quietly(&stored).await)
    }

    async fn item_exists(&self, id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}
