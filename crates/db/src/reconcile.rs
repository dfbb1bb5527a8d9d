//! Idempotent schema reconciliation.
//!
//! Brings a possibly-pre-existing database into the declared target shape
//! without destroying data, and is safe to re-run on every process start.
//! Only the baseline `CREATE TABLE IF NOT EXISTS` steps are fatal; column
//! additions, index creation, constraint verification, and lookup seeding are
//! best-effort and reported as advisories.

use std::collections::HashSet;

use sqlx::sqlite::SqliteConnection;
use sqlx::{Row, SqlitePool};

use inventaris_core::schema::{SchemaSpec, TableSpec};
use inventaris_core::AdvisoryFailure;
use inventaris_shared::{AppError, AppResult};

/// Outcome of a reconciliation run.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Best-effort steps that did not succeed. Never fatal.
    pub advisories: Vec<AdvisoryFailure>,
}

impl ReconcileReport {
    /// Whether every step, advisory ones included, succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Reconcile the live database with the declared schema.
///
/// Runs on a single connection checked out for the whole pass; the pool
/// guard returns it on every exit path. Tables are processed in declaration
/// order, so referenced tables exist before anything references them.
///
/// # Errors
///
/// Returns an error only when a baseline table cannot be created.
pub async fn reconcile(pool: &SqlitePool, schema: &SchemaSpec) -> AppResult<ReconcileReport> {
    let mut conn = pool.acquire().await?;
    let mut report = ReconcileReport::default();

    // Constraint enforcement is per-connection; asking again is harmless and
    // covers pools configured without the pragma.
    if let Err(e) = sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await {
        report.advisories.push(AdvisoryFailure::new(
            "enforce_foreign_keys",
            "connection",
            e.to_string(),
        ));
    }

    for table in &schema.tables {
        ensure_table(&mut conn, table, &mut report).await?;
    }

    Ok(report)
}

async fn ensure_table(
    conn: &mut SqliteConnection,
    table: &TableSpec,
    report: &mut ReconcileReport,
) -> AppResult<()> {
    // The one fatal step: without its baseline table the system cannot run.
    sqlx::query(&table.create_table_sql())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::Database(format!("create table {}: {e}", table.name)))?;

    // Legacy tables predate newer columns; add what is missing, advisory on
    // failure (e.g. defaults SQLite cannot add in place).
    let existing = existing_columns(conn, table.name).await?;
    for column in &table.columns {
        if existing.contains(column.name) {
            continue;
        }
        if let Err(e) = sqlx::query(&table.add_column_sql(column))
            .execute(&mut *conn)
            .await
        {
            report.advisories.push(AdvisoryFailure::new(
                "add_column",
                format!("{}.{}", table.name, column.name),
                e.to_string(),
            ));
        }
    }

    for index in &table.indexes {
        if let Err(e) = sqlx::query(&table.create_index_sql(index))
            .execute(&mut *conn)
            .await
        {
            report.advisories.push(AdvisoryFailure::new(
                "create_index",
                index.name.to_string(),
                e.to_string(),
            ));
        }
    }

    verify_foreign_keys(conn, table, report).await;

    for name in &table.seed_names {
        let sql = format!("INSERT OR IGNORE INTO {} (name) VALUES (?)", table.name);
        if let Err(e) = sqlx::query(&sql).bind(name).execute(&mut *conn).await {
            report.advisories.push(AdvisoryFailure::new(
                "seed_lookup",
                format!("{}.{name}", table.name),
                e.to_string(),
            ));
        }
    }

    Ok(())
}

async fn existing_columns(
    conn: &mut SqliteConnection,
    table: &str,
) -> AppResult<HashSet<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect())
}

/// Check that every declared foreign key exists on the live table.
///
/// SQLite cannot add a constraint to an existing table, so a legacy table
/// created before a constraint was declared keeps running without it; the gap
/// is surfaced as an advisory rather than papered over.
async fn verify_foreign_keys(
    conn: &mut SqliteConnection,
    table: &TableSpec,
    report: &mut ReconcileReport,
) {
    if table.foreign_keys.is_empty() {
        return;
    }

    let rows = match sqlx::query(&format!("PRAGMA foreign_key_list({})", table.name))
        .fetch_all(&mut *conn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            report.advisories.push(AdvisoryFailure::new(
                "verify_constraints",
                table.name.to_string(),
                e.to_string(),
            ));
            return;
        }
    };

    let live: Vec<(String, String)> = rows
        .iter()
        .map(|row| (row.get::<String, _>("table"), row.get::<String, _>("from")))
        .collect();

    for fk in &table.foreign_keys {
        let present = live
            .iter()
            .any(|(parent, from)| parent == fk.references_table && from == fk.column);
        if !present {
            report.advisories.push(AdvisoryFailure::new(
                "add_constraint",
                format!("{}.{}", table.name, fk.column),
                format!(
                    "foreign key to {} missing on pre-existing table",
                    fk.references_table
                ),
            ));
        }
    }
}
