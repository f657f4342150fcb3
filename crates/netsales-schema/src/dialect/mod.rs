//! Database dialect implementations.
//!
//! Each dialect renders the declarative schema model into DDL for one
//! database system. The reconciler checks the live catalog itself before
//! issuing anything, so dialects only have to produce the individual
//! create/add statements.

mod postgres;
mod sqlite;

pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::schema::{ColumnSpec, ColumnType, DefaultValue, IndexSpec, TableSpec};

/// Trait for database-specific DDL generation.
///
/// A statement returned with a leading `--` marks an operation the engine
/// cannot express; the reconciler records it as a per-item error instead
/// of executing it.
pub trait SchemaDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the SQL type name for the given column type.
    fn type_name(&self, column_type: &ColumnType) -> String;

    /// Returns the auto-increment keyword for this dialect.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Returns whether this dialect supports `ALTER TABLE ... ADD CONSTRAINT`.
    fn supports_add_constraint(&self) -> bool;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// Renders a default value, or `None` when the column has no default.
    fn render_default(&self, default: &DefaultValue) -> Option<String> {
        match default {
            DefaultValue::None => None,
            DefaultValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            DefaultValue::Integer(i) => Some(i.to_string()),
            DefaultValue::Float(f) => Some(f.to_string()),
            DefaultValue::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            DefaultValue::Expression(expr) => Some(expr.clone()),
        }
    }

    /// Generates column definition SQL.
    fn column_definition(&self, column: &ColumnSpec) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_name(&column.column_type),
        ];

        if column.primary_key {
            parts.push("PRIMARY KEY".to_string());
            if column.auto_increment {
                let keyword = self.auto_increment_keyword();
                if !keyword.is_empty() {
                    parts.push(keyword.to_string());
                }
            }
        }

        if !column.nullable && !column.primary_key {
            parts.push("NOT NULL".to_string());
        }

        if let Some(default_sql) = self.render_default(&column.default) {
            parts.push(format!("DEFAULT {default_sql}"));
        }

        if let Some(ref fk) = column.references {
            parts.push(format!(
                "REFERENCES {} ({})",
                self.quote_identifier(&fk.table),
                self.quote_identifier(&fk.column)
            ));
        }

        parts.join(" ")
    }

    /// Generates the skeleton create-if-absent statement for a table.
    ///
    /// Only the primary-key column is part of the skeleton; the remaining
    /// columns are layered on afterward, one statement each.
    fn create_table_sql(&self, table: &TableSpec) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.quote_identifier(&table.name),
            self.column_definition(&table.primary_key)
        )
    }

    /// Generates SQL for adding a column.
    fn add_column_sql(&self, table: &str, column: &ColumnSpec) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(column)
        )
    }

    /// Generates SQL adding the uniqueness constraint a column declares.
    fn add_unique_sql(&self, table: &str, constraint: &str, column: &str) -> String;

    /// Generates SQL adding a foreign-key constraint to an existing column.
    fn add_foreign_key_sql(&self, table: &str, constraint: &str, column: &ColumnSpec) -> String;

    /// Generates SQL for creating an index if absent.
    fn create_index_sql(&self, table: &str, index: &IndexSpec) -> String {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX IF NOT EXISTS ");
        sql.push_str(&self.quote_identifier(&index.name));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");

        let quoted: Vec<String> = index
            .columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect();
        sql.push_str(&quoted.join(", "));
        sql.push(')');

        sql
    }
}
