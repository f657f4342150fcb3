//! Live schema catalog introspection.
//!
//! The reconciler depends on exactly four read primitives: does a table
//! exist, which columns does it have, which indexes does it have, and
//! which of its columns already carry a foreign key. Any failure here is
//! fatal to the run (connectivity to the catalog is gone).

use std::collections::HashSet;

use sqlx::sqlite::SqlitePool;

use crate::error::Result;

/// Reads the current state of a live SQLite schema.
pub struct LiveCatalog {
    pool: SqlitePool,
}

impl LiveCatalog {
    /// Creates a new catalog reader over the given pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Checks whether a table exists.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Returns the column names of a table. Empty when the table is absent.
    pub async fn column_names(&self, table: &str) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Returns the index names attached to a table.
    ///
    /// Unique constraints are realized as unique indexes on SQLite, so
    /// this doubles as the constraint-presence check.
    pub async fn index_names(&self, table: &str) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Returns the names of columns on a table that already carry a
    /// foreign-key reference.
    pub async fn foreign_key_columns(&self, table: &str) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT \"from\" FROM pragma_foreign_key_list(?)")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
