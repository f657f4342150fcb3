//! Idempotent schema provisioning for the netsales CRM database.
//!
//! The crate centers on one component, the schema reconciler: given the
//! declarative table set the application expects, it brings a live schema
//! into conformance without destructive changes and is safe to invoke
//! repeatedly. Concretely:
//!
//! - **Schema model** - [`TableSpec`](schema::TableSpec) and friends
//!   describe tables, columns, constraints, and indexes independently of
//!   any engine's DDL syntax.
//! - **Dialects** - engine-specific DDL rendering (SQLite executes;
//!   PostgreSQL renders reviewable plans).
//! - **Catalog** - the handful of live-schema read primitives the
//!   reconciler depends on.
//! - **Reconciler** - the check-then-act walk: create missing tables as
//!   primary-key skeletons, layer columns on one at a time, then add
//!   missing constraints and indexes. Item failures land in the
//!   [`ReconciliationReport`](report::ReconciliationReport), not in a
//!   panic or early return.
//! - **Tables / Seed** - the canonical netsales table set and the
//!   post-reconcile default rows, both calling-code concerns.
//!
//! # Example
//!
//! ```rust,no_run
//! use netsales_schema::prelude::*;
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let pool = SqlitePoolOptions::new().connect("sqlite:netsales.db").await?;
//! let reconciler = Reconciler::new(pool, SqliteDialect::new());
//!
//! let report = reconciler.reconcile(&netsales_tables()).await?;
//! for error in &report.errors {
//!     eprintln!("{} {}: {}", error.kind, error.item, error.reason);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod dialect;
pub mod error;
pub mod reconciler;
pub mod report;
pub mod schema;
pub mod seed;
pub mod tables;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::LiveCatalog;
    pub use crate::dialect::{PostgresDialect, SchemaDialect, SqliteDialect};
    pub use crate::error::{Result, SchemaError};
    pub use crate::reconciler::Reconciler;
    pub use crate::report::{ItemError, ItemKind, ReconciliationReport, SchemaStatus};
    pub use crate::schema::{
        validate_tables, ColumnSpec, ColumnType, DefaultValue, ForeignKeyRef, IndexSpec, TableSpec,
    };
    pub use crate::seed::seed_defaults;
    pub use crate::tables::netsales_tables;
}
