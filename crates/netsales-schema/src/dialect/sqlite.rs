//! SQLite dialect.
//!
//! SQLite's ALTER TABLE is limited: no `ADD CONSTRAINT`, and an added
//! column may not carry a UNIQUE clause. Declared uniqueness is therefore
//! realized as a named unique index, and a foreign key can only ride along
//! inline on the ADD COLUMN that introduces its column.

use crate::schema::{ColumnSpec, ColumnType, DefaultValue};

use super::SchemaDialect;

/// SQLite schema dialect. This is the engine the reconciler executes
/// against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        let name = match column_type {
            ColumnType::Integer | ColumnType::BigInt => "INTEGER",
            ColumnType::Text | ColumnType::Varchar(_) => "TEXT",
            ColumnType::Boolean => "INTEGER", // SQLite stores booleans as 0/1
            ColumnType::Date | ColumnType::Timestamp | ColumnType::Json => "TEXT",
            ColumnType::Double => "REAL",
            ColumnType::Decimal(_, _) => "NUMERIC",
        };
        name.to_string()
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn supports_add_constraint(&self) -> bool {
        false
    }

    fn render_default(&self, default: &DefaultValue) -> Option<String> {
        match default {
            DefaultValue::None => None,
            // Booleans are stored as 0/1
            DefaultValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            DefaultValue::Integer(i) => Some(i.to_string()),
            DefaultValue::Float(f) => Some(f.to_string()),
            DefaultValue::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            DefaultValue::Expression(expr) => Some(expr.clone()),
        }
    }

    fn add_unique_sql(&self, table: &str, constraint: &str, column: &str) -> String {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
            self.quote_identifier(constraint),
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    fn add_foreign_key_sql(&self, table: &str, constraint: &str, column: &ColumnSpec) -> String {
        // SQLite cannot retrofit a foreign key onto an existing column; the
        // reconciler reports this line as a per-item error.
        format!(
            "-- sqlite cannot add foreign key {} on existing column {}.{}",
            constraint, table, column.name
        )
    }
}
