//! Schema reconciler.
//!
//! Brings a live schema's tables and columns into a superset of a declared
//! [`TableSpec`] set, idempotently and without destructive changes. Tables
//! are processed in caller order (foreign-key parents first); each item is
//! a single check-then-act step against the live catalog, so a run can be
//! resumed after a partial failure simply by invoking it again.

use std::collections::HashSet;

use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

use crate::catalog::LiveCatalog;
use crate::dialect::SchemaDialect;
use crate::error::Result;
use crate::report::{ItemError, ItemKind, ReconciliationReport, SchemaStatus};
use crate::schema::{validate_tables, TableSpec};

/// One pending mutation, resolved against the live catalog.
struct Action {
    kind: ItemKind,
    table: String,
    item: String,
    sql: String,
}

/// Reconciles a declared table set against a live schema.
pub struct Reconciler<D: SchemaDialect> {
    pool: SqlitePool,
    dialect: D,
    catalog: LiveCatalog,
}

impl<D: SchemaDialect> Reconciler<D> {
    /// Creates a new reconciler over the given pool.
    pub fn new(pool: SqlitePool, dialect: D) -> Self {
        let catalog = LiveCatalog::new(pool.clone());
        Self {
            pool,
            dialect,
            catalog,
        }
    }

    /// Returns the live catalog reader.
    #[must_use]
    pub fn catalog(&self) -> &LiveCatalog {
        &self.catalog
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Walks the declared tables against the live catalog and resolves the
    /// mutations a reconcile run would have to issue right now.
    async fn collect_actions(&self, tables: &[TableSpec]) -> Result<Vec<Action>> {
        validate_tables(tables)?;

        let mut actions = Vec::new();
        for table in tables {
            if !self.catalog.table_exists(&table.name).await? {
                actions.push(Action {
                    kind: ItemKind::Table,
                    table: table.name.clone(),
                    item: table.name.clone(),
                    sql: self.dialect.create_table_sql(table),
                });
            }

            let existing = self.catalog.column_names(&table.name).await?;
            for column in &table.columns {
                if !existing.contains(&column.name) {
                    actions.push(Action {
                        kind: ItemKind::Column,
                        table: table.name.clone(),
                        item: table.column_id(&column.name),
                        sql: self.dialect.add_column_sql(&table.name, column),
                    });
                }
            }

            let indexes = self.catalog.index_names(&table.name).await?;
            for column in &table.columns {
                if column.unique {
                    let constraint = column.unique_constraint_name(&table.name);
                    if !indexes.contains(&constraint) {
                        actions.push(Action {
                            kind: ItemKind::Constraint,
                            table: table.name.clone(),
                            item: constraint.clone(),
                            sql: self.dialect.add_unique_sql(
                                &table.name,
                                &constraint,
                                &column.name,
                            ),
                        });
                    }
                }
            }

            // A foreign key on a new column rides along with its ADD COLUMN;
            // only columns that pre-exist without their reference need a
            // separate constraint statement.
            let fk_columns = self.catalog.foreign_key_columns(&table.name).await?;
            for column in &table.columns {
                if column.references.is_some()
                    && existing.contains(&column.name)
                    && !fk_columns.contains(&column.name)
                {
                    let constraint = column.foreign_key_name(&table.name);
                    actions.push(Action {
                        kind: ItemKind::Constraint,
                        table: table.name.clone(),
                        item: constraint.clone(),
                        sql: self
                            .dialect
                            .add_foreign_key_sql(&table.name, &constraint, column),
                    });
                }
            }

            for index in &table.indexes {
                if !indexes.contains(&index.name) {
                    actions.push(Action {
                        kind: ItemKind::Index,
                        table: table.name.clone(),
                        item: index.name.clone(),
                        sql: self.dialect.create_index_sql(&table.name, index),
                    });
                }
            }
        }

        Ok(actions)
    }

    /// Makes the live schema a superset of the declared tables.
    ///
    /// Item failures (incompatible pre-existing definitions, constraint
    /// violations against live data, unsupported engine operations) are
    /// recorded in the report and do not abort the run; only a catalog
    /// read failure does. Never retries: a failed constraint will fail
    /// identically until the data is remediated.
    pub async fn reconcile(&self, tables: &[TableSpec]) -> Result<ReconciliationReport> {
        let actions = self.collect_actions(tables).await?;
        let mut report = ReconciliationReport::new();
        let mut failed_tables: HashSet<String> = HashSet::new();

        for action in actions {
            // Without its skeleton nothing else on the table can succeed
            if failed_tables.contains(&action.table) {
                continue;
            }

            if let Some(reason) = action.sql.strip_prefix("-- ") {
                warn!(item = %action.item, reason, "Unsupported on this engine");
                report.errors.push(ItemError {
                    kind: action.kind,
                    item: action.item,
                    reason: reason.to_string(),
                });
                continue;
            }

            debug!(sql = %action.sql, "Executing DDL");
            match sqlx::query(&action.sql).execute(&self.pool).await {
                Ok(_) => {
                    info!(kind = %action.kind, item = %action.item, "Applied");
                    match action.kind {
                        ItemKind::Table => report.created_tables.push(action.item),
                        ItemKind::Column => report.added_columns.push(action.item),
                        ItemKind::Constraint => report.added_constraints.push(action.item),
                        ItemKind::Index => report.created_indexes.push(action.item),
                    }
                }
                Err(err) => {
                    warn!(kind = %action.kind, item = %action.item, error = %err, "Failed");
                    if action.kind == ItemKind::Table {
                        failed_tables.insert(action.table.clone());
                    }
                    report.errors.push(ItemError {
                        kind: action.kind,
                        item: action.item,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            changes = report.changes(),
            errors = report.errors.len(),
            "Reconciliation complete"
        );
        Ok(report)
    }

    /// Returns the DDL statements a reconcile run would issue right now,
    /// executing nothing. Unsupported operations appear as `--` comment
    /// lines so the output stays a reviewable script.
    pub async fn plan(&self, tables: &[TableSpec]) -> Result<Vec<String>> {
        let actions = self.collect_actions(tables).await?;
        Ok(actions.into_iter().map(|action| action.sql).collect())
    }

    /// Summarizes drift between the declared tables and the live schema
    /// without mutating anything.
    pub async fn status(&self, tables: &[TableSpec]) -> Result<SchemaStatus> {
        let actions = self.collect_actions(tables).await?;
        let mut status = SchemaStatus {
            in_sync: actions.is_empty(),
            missing_tables: Vec::new(),
            missing_columns: Vec::new(),
            missing_constraints: Vec::new(),
            missing_indexes: Vec::new(),
        };

        for action in actions {
            match action.kind {
                ItemKind::Table => status.missing_tables.push(action.item),
                ItemKind::Column => status.missing_columns.push(action.item),
                ItemKind::Constraint => status.missing_constraints.push(action.item),
                ItemKind::Index => status.missing_indexes.push(action.item),
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::error::SchemaError;
    use crate::schema::{ColumnSpec, ColumnType, DefaultValue, IndexSpec};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    fn widgets_tables() -> Vec<TableSpec> {
        vec![
            TableSpec::new("widgets", ColumnSpec::new("id", ColumnType::BigInt).auto_increment())
                .column(ColumnSpec::new("label", ColumnType::Text)),
        ]
    }

    #[tokio::test]
    async fn test_creates_missing_structure_then_noops() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        let report = reconciler.reconcile(&widgets_tables()).await.unwrap();
        assert_eq!(report.created_tables, vec!["widgets"]);
        assert_eq!(report.added_columns, vec!["widgets.label"]);
        assert!(report.errors.is_empty());

        let second = reconciler.reconcile(&widgets_tables()).await.unwrap();
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn test_existing_rows_and_extra_columns_survive() {
        let pool = create_test_pool().await;
        sqlx::query(
            "CREATE TABLE customers (id INTEGER PRIMARY KEY, legacy_code TEXT, name INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO customers (legacy_code, name) VALUES ('L-1', 7)")
            .execute(&pool)
            .await
            .unwrap();

        // The declared table omits legacy_code and disagrees on name's
        // type; neither may be touched.
        let tables = vec![
            TableSpec::new("customers", ColumnSpec::new("id", ColumnType::BigInt))
                .column(ColumnSpec::new("name", ColumnType::Varchar(100)))
                .column(ColumnSpec::new("phone", ColumnType::Varchar(20))),
        ];

        let reconciler = Reconciler::new(pool.clone(), SqliteDialect::new());
        let report = reconciler.reconcile(&tables).await.unwrap();

        assert_eq!(report.added_columns, vec!["customers.phone"]);
        assert!(report.created_tables.is_empty());
        assert!(report.errors.is_empty());

        let row: (String, i64) =
            sqlx::query_as("SELECT legacy_code, name FROM customers")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row, ("L-1".to_string(), 7));
    }

    #[tokio::test]
    async fn test_column_failure_is_isolated() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        // SQLite rejects ADD COLUMN with a non-constant default, so the
        // middle column fails while its siblings land.
        let tables = vec![
            TableSpec::new("events", ColumnSpec::new("id", ColumnType::BigInt))
                .column(ColumnSpec::new("kind", ColumnType::Text))
                .column(
                    ColumnSpec::new("occurred_at", ColumnType::Timestamp)
                        .default_value(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())),
                )
                .column(ColumnSpec::new("payload", ColumnType::Json)),
        ];

        let report = reconciler.reconcile(&tables).await.unwrap();
        assert_eq!(report.added_columns, vec!["events.kind", "events.payload"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ItemKind::Column);
        assert_eq!(report.errors[0].item, "events.occurred_at");

        // Re-running re-reports the same failure but re-adds nothing
        let second = reconciler.reconcile(&tables).await.unwrap();
        assert!(second.added_columns.is_empty());
        assert_eq!(second.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_parent_before_child_foreign_key() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        let tables = vec![
            TableSpec::new("users", ColumnSpec::new("id", ColumnType::BigInt).auto_increment()),
            TableSpec::new("hot_news", ColumnSpec::new("id", ColumnType::BigInt).auto_increment())
                .column(ColumnSpec::new("created_by", ColumnType::BigInt).references("users", "id")),
        ];

        let report = reconciler.reconcile(&tables).await.unwrap();
        assert!(report.errors.is_empty());

        let fk_columns = reconciler
            .catalog()
            .foreign_key_columns("hot_news")
            .await
            .unwrap();
        assert!(fk_columns.contains("created_by"));
    }

    #[tokio::test]
    async fn test_foreign_key_on_pre_existing_column_is_reported() {
        let pool = create_test_pool().await;
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE hot_news (id INTEGER PRIMARY KEY, created_by INTEGER)")
            .execute(&pool)
            .await
            .unwrap();

        let tables = vec![
            TableSpec::new("users", ColumnSpec::new("id", ColumnType::BigInt)),
            TableSpec::new("hot_news", ColumnSpec::new("id", ColumnType::BigInt))
                .column(ColumnSpec::new("created_by", ColumnType::BigInt).references("users", "id")),
        ];

        let reconciler = Reconciler::new(pool, SqliteDialect::new());
        let report = reconciler.reconcile(&tables).await.unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ItemKind::Constraint);
        assert_eq!(report.errors[0].item, "fk_hot_news_created_by");
    }

    #[tokio::test]
    async fn test_declared_uniqueness_is_enforced() {
        let pool = create_test_pool().await;
        let tables = vec![
            TableSpec::new("customers", ColumnSpec::new("id", ColumnType::BigInt).auto_increment())
                .column(ColumnSpec::new("customer_id", ColumnType::Varchar(30)).unique()),
        ];

        let reconciler = Reconciler::new(pool.clone(), SqliteDialect::new());
        let report = reconciler.reconcile(&tables).await.unwrap();
        assert_eq!(report.added_constraints, vec!["uq_customers_customer_id"]);

        sqlx::query("INSERT INTO customers (customer_id) VALUES ('C-100')")
            .execute(&pool)
            .await
            .unwrap();
        let duplicate = sqlx::query("INSERT INTO customers (customer_id) VALUES ('C-100')")
            .execute(&pool)
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_declared_indexes_are_created_once() {
        let pool = create_test_pool().await;
        let tables = vec![
            TableSpec::new("tickets", ColumnSpec::new("id", ColumnType::BigInt))
                .column(ColumnSpec::new("status", ColumnType::Varchar(20)))
                .index(IndexSpec::new("idx_tickets_status", vec!["status".to_string()])),
        ];

        let reconciler = Reconciler::new(pool, SqliteDialect::new());
        let report = reconciler.reconcile(&tables).await.unwrap();
        assert_eq!(report.created_indexes, vec!["idx_tickets_status"]);

        let second = reconciler.reconcile(&tables).await.unwrap();
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn test_plan_executes_nothing() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        let statements = reconciler.plan(&widgets_tables()).await.unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS \"widgets\""));
        assert!(!reconciler.catalog().table_exists("widgets").await.unwrap());

        reconciler.reconcile(&widgets_tables()).await.unwrap();
        let after = reconciler.plan(&widgets_tables()).await.unwrap();
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_drift() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        let drifted = reconciler.status(&widgets_tables()).await.unwrap();
        assert!(!drifted.in_sync);
        assert_eq!(drifted.missing_tables, vec!["widgets"]);
        assert_eq!(drifted.missing_columns, vec!["widgets.label"]);

        reconciler.reconcile(&widgets_tables()).await.unwrap();
        let synced = reconciler.status(&widgets_tables()).await.unwrap();
        assert!(synced.in_sync);
        assert!(synced.missing_tables.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_table_set_aborts() {
        let pool = create_test_pool().await;
        let reconciler = Reconciler::new(pool, SqliteDialect::new());

        let tables = vec![
            TableSpec::new("users", ColumnSpec::new("id", ColumnType::BigInt))
                .column(ColumnSpec::new("email", ColumnType::Text))
                .column(ColumnSpec::new("email", ColumnType::Text)),
        ];

        let result = reconciler.reconcile(&tables).await;
        assert!(matches!(result, Err(SchemaError::InvalidTableSpec(_))));
        assert!(!reconciler.catalog().table_exists("users").await.unwrap());
    }
}
