//! Declarative schema model.
//!
//! These types describe the structure the netsales database is expected to
//! have: tables, columns, uniqueness, foreign keys, and indexes. They carry
//! no SQL themselves; a [`SchemaDialect`](crate::dialect::SchemaDialect)
//! renders them into DDL for a specific engine, which keeps ad-hoc string
//! interpolation of table and column names out of the picture entirely.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Semantic column types supported by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(u16),
    /// Boolean.
    Boolean,
    /// Date only.
    Date,
    /// Date and time.
    Timestamp,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// JSON document.
    Json,
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

/// A foreign-key reference carried by a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table name.
    pub table: String,
    /// Referenced column name.
    pub column: String,
}

/// Declarative description of a single column.
///
/// Identity is (table name, column name); the table name comes from the
/// enclosing [`TableSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Semantic data type.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: DefaultValue,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Whether this column carries a uniqueness constraint.
    pub unique: bool,
    /// Foreign-key reference (if any).
    pub references: Option<ForeignKeyRef>,
}

impl ColumnSpec {
    /// Creates a new nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: DefaultValue::None,
            primary_key: false,
            auto_increment: false,
            unique: false,
            references: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false; // Primary keys are always NOT NULL
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the column as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a foreign-key reference to another table's column.
    #[must_use]
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Name of the uniqueness constraint this column declares.
    #[must_use]
    pub fn unique_constraint_name(&self, table: &str) -> String {
        format!("uq_{}_{}", table, self.name)
    }

    /// Name of the foreign-key constraint this column declares.
    #[must_use]
    pub fn foreign_key_name(&self, table: &str) -> String {
        format!("fk_{}_{}", table, self.name)
    }
}

/// Declarative description of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Index name.
    pub name: String,
    /// Columns included in the index, in order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

impl IndexSpec {
    /// Creates a new non-unique index.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    /// Marks the index as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Declarative description of a table.
///
/// The primary-key column is held separately from the remaining columns:
/// the reconciler creates the table as a skeleton carrying only the key,
/// then layers the other columns on one at a time so each addition can be
/// checked and retried independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name. Identity within a schema.
    pub name: String,
    /// The minimal primary-key column the skeleton is created with.
    pub primary_key: ColumnSpec,
    /// Non-key columns, in declaration order.
    pub columns: Vec<ColumnSpec>,
    /// Index definitions.
    pub indexes: Vec<IndexSpec>,
}

impl TableSpec {
    /// Creates a new table around its primary-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, primary_key: ColumnSpec) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.primary_key(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets a column by name (the primary key included).
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        if self.primary_key.name == name {
            return Some(&self.primary_key);
        }
        self.columns.iter().find(|c| c.name == name)
    }

    /// Qualified identity of a column, as reported per run.
    #[must_use]
    pub fn column_id(&self, column: &str) -> String {
        format!("{}.{}", self.name, column)
    }
}

/// Validates a table set before it is reconciled.
///
/// These are authoring mistakes, not live-schema conditions, so they abort
/// the run instead of landing in the report: duplicate table names,
/// duplicate column names within a table, indexes over unknown columns,
/// and a foreign key whose parent appears later in the same set (the
/// reconciler processes tables in caller order and does not sort them).
pub fn validate_tables(tables: &[TableSpec]) -> Result<()> {
    let mut seen_tables = std::collections::HashSet::new();
    for (position, table) in tables.iter().enumerate() {
        if !seen_tables.insert(table.name.as_str()) {
            return Err(SchemaError::InvalidTableSpec(format!(
                "duplicate table '{}'",
                table.name
            )));
        }

        let mut seen_columns = std::collections::HashSet::new();
        seen_columns.insert(table.primary_key.name.as_str());
        for column in &table.columns {
            if !seen_columns.insert(column.name.as_str()) {
                return Err(SchemaError::InvalidTableSpec(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name, table.name
                )));
            }
        }

        for index in &table.indexes {
            for column in &index.columns {
                if table.get_column(column).is_none() {
                    return Err(SchemaError::InvalidTableSpec(format!(
                        "index '{}' references unknown column '{}' on table '{}'",
                        index.name, column, table.name
                    )));
                }
            }
        }

        for column in &table.columns {
            if let Some(ref fk) = column.references {
                let parent_position = tables.iter().position(|t| t.name == fk.table);
                if parent_position.is_some_and(|p| p > position) {
                    return Err(SchemaError::InvalidTableSpec(format!(
                        "table '{}' references '{}' which is declared after it; \
                         order parents before children",
                        table.name, fk.table
                    )));
                }
            }
        }
    }
    Ok(())
}
