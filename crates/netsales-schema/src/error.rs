//! Error types for schema reconciliation.
//!
//! Only run-aborting conditions live here. Failures scoped to a single
//! table, column, constraint, or index are collected into the
//! [`ReconciliationReport`](crate::report::ReconciliationReport) instead
//! of being raised.

/// Fatal errors that abort a reconciliation run.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Database error while reading the live catalog or connecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The declared table set is malformed (authoring error).
    #[error("Invalid table definition: {0}")]
    InvalidTableSpec(String),

    /// Failure while seeding default rows.
    #[error("Seeding failed: {0}")]
    Seed(String),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
