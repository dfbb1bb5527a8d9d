//! Item store.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

use inventaris_core::{AdvisoryFailure, BlobStore};
use inventaris_shared::{AppError, AppResult};

/// An item row as served to the UI, with joined lookup names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ItemRow {
    /// Unique identifier.
    pub id: i64,
    /// Display label.
    pub label: String,
    /// Type reference.
    pub type_id: Option<i64>,
    /// Joined type name.
    pub type_name: Option<String>,
    /// Size reference.
    pub size_id: Option<i64>,
    /// Joined size name.
    pub size_name: Option<String>,
    /// Location reference.
    pub location_id: Option<i64>,
    /// Joined location name.
    pub location_name: Option<String>,
    /// Free-form box number.
    pub box_no: Option<String>,
    /// Quantity on hand.
    pub qty: Option<i64>,
    /// Free-form description.
    pub description: Option<String>,
    /// Store the item was bought at.
    pub store: Option<String>,
    /// Purchase date as entered.
    pub purchase_date: Option<String>,
    /// Warranty duration in months.
    pub warranty_months: Option<i64>,
    /// Vendor article number.
    pub article_no: Option<String>,
    /// Product link.
    pub link_url: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Server-assigned creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields for a new item. Optional fields arrive already normalized: absent
/// or empty input is `None`, never zero.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    /// Display label (required).
    pub label: String,
    /// Type reference.
    pub type_id: Option<i64>,
    /// Size reference.
    pub size_id: Option<i64>,
    /// Location reference.
    pub location_id: Option<i64>,
    /// Free-form box number.
    pub box_no: Option<String>,
    /// Quantity on hand.
    pub qty: Option<i64>,
    /// Free-form description.
    pub description: Option<String>,
    /// Store the item was bought at.
    pub store: Option<String>,
    /// Purchase date as entered.
    pub purchase_date: Option<String>,
    /// Warranty duration in months.
    pub warranty_months: Option<i64>,
    /// Vendor article number.
    pub article_no: Option<String>,
    /// Product link.
    pub link_url: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

const LIST_SQL: &str = "\
SELECT i.id, i.label,
       i.type_id, t.name AS type_name,
       i.size_id, s.name AS size_name,
       i.location_id, l.name AS location_name,
       i.box_no, i.qty, i.description, i.store, i.purchase_date,
       i.warranty_months, i.article_no, i.link_url, i.notes, i.created_at
FROM items i
LEFT JOIN types t ON t.id = i.type_id
LEFT JOIN sizes s ON s.id = i.size_id
LEFT JOIN locations l ON l.id = i.location_id";

/// Store for items and their attachment cleanup.
#[derive(Debug, Clone)]
pub struct ItemStore {
    pool: SqlitePool,
    blobs: Arc<BlobStore>,
}

impl ItemStore {
    /// Create a new item store.
    #[must_use]
    pub fn new(pool: SqlitePool, blobs: Arc<BlobStore>) -> Self {
        Self { pool, blobs }
    }

    /// List items newest-first with joined lookup names.
    pub async fn list(&self) -> AppResult<Vec<ItemRow>> {
        let sql = format!("{LIST_SQL}\nORDER BY i.id DESC");
        Ok(sqlx::query_as::<_, ItemRow>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Fetch a single item.
    pub async fn get(&self, id: i64) -> AppResult<ItemRow> {
        let sql = format!("{LIST_SQL}\nWHERE i.id = ?");
        sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {id}")))
    }

    /// Insert an item and return its id. The label must be non-empty after
    /// trimming.
    pub async fn create(&self, item: &NewItem) -> AppResult<i64> {
        let label = item.label.trim();
        if label.is_empty() {
            return Err(AppError::Validation("label_required".to_string()));
        }

        let result = sqlx::query(
            "INSERT INTO items (label, type_id, size_id, location_id, box_no, qty, \
             description, store, purchase_date, warranty_months, article_no, link_url, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(label)
        .bind(item.type_id)
        .bind(item.size_id)
        .bind(item.location_id)
        .bind(&item.box_no)
        .bind(item.qty)
        .bind(&item.description)
        .bind(&item.store)
        .bind(&item.purchase_date)
        .bind(item.warranty_months)
        .bind(&item.article_no)
        .bind(&item.link_url)
        .bind(&item.notes)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Delete an item by id, cascading to its attachments.
    ///
    /// The attachment rows are removed by the foreign key cascade; their
    /// backing files are deleted best-effort afterwards and any leftovers are
    /// returned as advisories. Deleting an absent id succeeds.
    pub async fn delete(&self, id: i64) -> AppResult<Vec<AdvisoryFailure>> {
        let stored_names: Vec<String> =
            sqlx::query_scalar("SELECT stored_name FROM attachments WHERE item_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let mut advisories = Vec::new();
        for name in &stored_names {
            if let Some(advisory) = self.blobs.remove_quietly(name).await {
                advisories.push(advisory);
            }
        }
        Ok(advisories)
    }
}
