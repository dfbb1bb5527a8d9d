//! Box and box-content store.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

use inventaris_shared::{AppError, AppResult};

/// A box row with its location name and content count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BoxRow {
    /// Unique identifier.
    pub id: i64,
    /// Display label.
    pub label: String,
    /// Location reference.
    pub location_id: Option<i64>,
    /// Joined location name.
    pub location_name: Option<String>,
    /// Number of content lines in the box.
    pub item_count: i64,
    /// Server-assigned creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields for a new box.
#[derive(Debug, Clone, Default)]
pub struct NewBox {
    /// Display label (required).
    pub label: String,
    /// Location reference.
    pub location_id: Option<i64>,
}

/// A content line inside a box.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BoxItemRow {
    /// Unique identifier.
    pub id: i64,
    /// Owning box.
    pub box_id: i64,
    /// Content name.
    pub name: String,
    /// Quantity.
    pub qty: Option<i64>,
    /// Server-assigned creation timestamp.
    pub created_at: NaiveDateTime,
}

/// Fields for a new box content line.
#[derive(Debug, Clone, Default)]
pub struct NewBoxItem {
    /// Content name (required).
    pub name: String,
    /// Quantity.
    pub qty: Option<i64>,
}

/// Store for boxes and their content lines.
#[derive(Debug, Clone)]
pub struct BoxStore {
    pool: SqlitePool,
}

impl BoxStore {
    /// Create a new box store.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List boxes ordered by label, with location name and content count.
    pub async fn list(&self) -> AppResult<Vec<BoxRow>> {
        Ok(sqlx::query_as::<_, BoxRow>(
            "SELECT b.id, b.label, b.location_id, l.name AS location_name, \
             (SELECT COUNT(*) FROM box_items bi WHERE bi.box_id = b.id) AS item_count, \
             b.created_at \
             FROM boxes b \
             LEFT JOIN locations l ON l.id = b.location_id \
             ORDER BY b.label ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Insert a box and return its id.
    pub async fn create(&self, new_box: &NewBox) -> AppResult<i64> {
        let label = new_box.label.trim();
        if label.is_empty() {
            return Err(AppError::Validation("label_required".to_string()));
        }

        let result = sqlx::query("INSERT INTO boxes (label, location_id) VALUES (?, ?)")
            .bind(label)
            .bind(new_box.location_id)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Delete a box by id. Content lines go with it via the foreign key
    /// cascade; deleting an absent id succeeds.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM boxes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// List the content lines of a box, newest-first.
    pub async fn list_items(&self, box_id: i64) -> AppResult<Vec<BoxItemRow>> {
        Ok(sqlx::query_as::<_, BoxItemRow>(
            "SELECT id, box_id, name, qty, created_at FROM box_items \
             WHERE box_id = ? ORDER BY id DESC",
        )
        .bind(box_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Add a content line under a box.
    pub async fn create_item(&self, box_id: i64, item: &NewBoxItem) -> AppResult<i64> {
        let name = item.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name_required".to_string()));
        }

        if !self.box_exists(box_id).await? {
            return Err(AppError::NotFound(format!("box {box_id}")));
        }

        let result = sqlx::query("INSERT INTO box_items (box_id, name, qty) VALUES (?, ?, ?)")
            .bind(box_id)
            .bind(name)
            .bind(item.qty)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Delete a content line by id. Absent ids succeed.
    pub async fn delete_item(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM box_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn box_exists(&self, id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM boxes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}
