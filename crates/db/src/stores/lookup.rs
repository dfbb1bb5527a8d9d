//! Lookup table store.
//!
//! One store covers all three lookup tables. The table is selected through a
//! closed enum, never a caller-supplied string, so the rendered SQL only ever
//! names tables the schema declares.

use std::fmt;

use serde::Serialize;
use sqlx::SqlitePool;

use inventaris_shared::{AppError, AppResult};

/// The closed set of lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Part/item types.
    Types,
    /// Storage locations.
    Locations,
    /// Part sizes.
    Sizes,
}

impl LookupKind {
    /// Backing table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Types => "types",
            Self::Locations => "locations",
            Self::Sizes => "sizes",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A lookup row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LookupRow {
    /// Unique identifier.
    pub id: i64,
    /// Unique display name.
    pub name: String,
}

/// Store for lookup tables.
#[derive(Debug, Clone)]
pub struct LookupStore {
    pool: SqlitePool,
}

impl LookupStore {
    /// Create a new lookup store.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List rows ordered by name.
    pub async fn list(&self, kind: LookupKind) -> AppResult<Vec<LookupRow>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY name ASC", kind.table());
        Ok(sqlx::query_as::<_, LookupRow>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Insert a row and return its id. The name must be non-empty after
    /// trimming.
    pub async fn create(&self, kind: LookupKind, name: &str) -> AppResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name_required".to_string()));
        }

        let sql = format!("INSERT INTO {} (name) VALUES (?)", kind.table());
        let result = sqlx::query(&sql).bind(name).execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    /// Delete a row by id. Deleting an absent id succeeds; referencing rows
    /// keep living with their foreign key cleared by `ON DELETE SET NULL`.
    pub async fn delete(&self, kind: LookupKind, id: i64) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LookupKind::Types, "types")]
    #[case(LookupKind::Locations, "locations")]
    #[case(LookupKind::Sizes, "sizes")]
    fn test_table_names(#[case] kind: LookupKind, #[case] table: &str) {
        assert_eq!(kind.table(), table);
        assert_eq!(kind.to_string(), table);
    }
}
