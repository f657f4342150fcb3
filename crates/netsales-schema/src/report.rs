//! Per-run reconciliation reporting.
//!
//! A [`ReconciliationReport`] is produced by every reconcile run and
//! discarded after being rendered (CLI text or HTTP JSON). Item failures
//! are data in the report, never errors raised to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of schema object an item entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A table.
    Table,
    /// A column.
    Column,
    /// A uniqueness or foreign-key constraint.
    Constraint,
    /// An index.
    Index,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Constraint => "constraint",
            Self::Index => "index",
        };
        f.write_str(label)
    }
}

/// A recorded per-item failure: what failed and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemError {
    /// Kind of the failed object.
    pub kind: ItemKind,
    /// Identity of the failed object (e.g. `customers.email`).
    pub item: String,
    /// Underlying reason, as reported by the engine.
    pub reason: String,
}

/// Outcome of a single reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Tables created this run.
    pub created_tables: Vec<String>,
    /// Columns added this run, as `table.column`.
    pub added_columns: Vec<String>,
    /// Uniqueness/foreign-key constraints added this run, by name.
    pub added_constraints: Vec<String>,
    /// Indexes created this run, by name.
    pub created_indexes: Vec<String>,
    /// Per-item failures encountered this run.
    pub errors: Vec<ItemError>,
}

impl ReconciliationReport {
    /// Creates an empty report stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            created_tables: Vec::new(),
            added_columns: Vec::new(),
            added_constraints: Vec::new(),
            created_indexes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Number of schema changes applied.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.created_tables.len()
            + self.added_columns.len()
            + self.added_constraints.len()
            + self.created_indexes.len()
    }

    /// Whether the run completed without any per-item failure.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the run mutated nothing (the live schema already conformed).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes() == 0 && self.errors.is_empty()
    }
}

impl Default for ReconciliationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only drift summary: what a reconcile run would have to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaStatus {
    /// Whether the live schema already satisfies the declared tables.
    pub in_sync: bool,
    /// Declared tables absent from the live schema.
    pub missing_tables: Vec<String>,
    /// Declared columns absent from the live schema, as `table.column`.
    pub missing_columns: Vec<String>,
    /// Declared constraints absent from the live schema, by name.
    pub missing_constraints: Vec<String>,
    /// Declared indexes absent from the live schema, by name.
    pub missing_indexes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_noop() {
        let report = ReconciliationReport::new();
        assert!(report.is_noop());
        assert!(report.is_clean());
        assert_eq!(report.changes(), 0);
    }

    #[test]
    fn test_errors_break_noop_but_not_changes() {
        let mut report = ReconciliationReport::new();
        report.errors.push(ItemError {
            kind: ItemKind::Column,
            item: "customers.email".to_string(),
            reason: "duplicate column name".to_string(),
        });

        assert!(!report.is_noop());
        assert!(!report.is_clean());
        assert_eq!(report.changes(), 0);
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = ReconciliationReport::new();
        report.created_tables.push("widgets".to_string());
        report.added_columns.push("widgets.label".to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["created_tables"][0], "widgets");
        assert_eq!(json["added_columns"][0], "widgets.label");
        assert!(json["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_item_kind_serializes_snake_case() {
        let err = ItemError {
            kind: ItemKind::Constraint,
            item: "uq_customers_customer_id".to_string(),
            reason: "UNIQUE constraint failed".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "constraint");
        assert_eq!(ItemKind::Index.to_string(), "index");
    }
}
