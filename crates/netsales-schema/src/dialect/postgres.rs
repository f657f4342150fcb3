//! PostgreSQL dialect.
//!
//! Rendering-only: plans generated with this dialect let operators review
//! the DDL a reconcile run would issue against a PostgreSQL deployment.
//! Execution in this crate goes through [`SqliteDialect`](super::SqliteDialect).

use crate::schema::{ColumnSpec, ColumnType};

use super::SchemaDialect;

/// PostgreSQL schema dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            ColumnType::Json => "JSONB".to_string(),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        // PostgreSQL uses SERIAL types instead of a keyword; see
        // column_definition below.
        ""
    }

    fn supports_add_constraint(&self) -> bool {
        true
    }

    fn column_definition(&self, column: &ColumnSpec) -> String {
        // Auto-incrementing keys become SERIAL/BIGSERIAL
        let type_name = if column.auto_increment && column.primary_key {
            match column.column_type {
                ColumnType::Integer => "SERIAL".to_string(),
                ColumnType::BigInt => "BIGSERIAL".to_string(),
                ref other => self.type_name(other),
            }
        } else {
            self.type_name(&column.column_type)
        };

        let mut sql = format!("{} {}", self.quote_identifier(&column.name), type_name);

        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !column.nullable {
            sql.push_str(" NOT NULL");
        }

        if let Some(default_sql) = self.render_default(&column.default) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default_sql);
        }

        if let Some(ref fk) = column.references {
            sql.push_str(&format!(
                " REFERENCES {} ({})",
                self.quote_identifier(&fk.table),
                self.quote_identifier(&fk.column)
            ));
        }

        sql
    }

    fn add_unique_sql(&self, table: &str, constraint: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
            self.quote_identifier(table),
            self.quote_identifier(constraint),
            self.quote_identifier(column)
        )
    }

    fn add_foreign_key_sql(&self, table: &str, constraint: &str, column: &ColumnSpec) -> String {
        let Some(ref fk) = column.references else {
            return format!("-- column {}.{} declares no reference", table, column.name);
        };
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_identifier(table),
            self.quote_identifier(constraint),
            self.quote_identifier(&column.name),
            self.quote_identifier(&fk.table),
            self.quote_identifier(&fk.column)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DefaultValue, TableSpec};

    #[test]
    fn test_auto_increment_key_uses_bigserial() {
        let table = TableSpec::new(
            "users",
            ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
        );
        let sql = PostgresDialect::new().create_table_sql(&table);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" BIGSERIAL PRIMARY KEY)"
        );
    }

    #[test]
    fn test_boolean_default_renders_as_keyword() {
        let column = ColumnSpec::new("active", ColumnType::Boolean)
            .not_null()
            .default_value(DefaultValue::Bool(true));

        let sql = PostgresDialect::new().add_column_sql("products", &column);
        assert_eq!(
            sql,
            "ALTER TABLE \"products\" ADD COLUMN \"active\" BOOLEAN NOT NULL DEFAULT TRUE"
        );
    }

    #[test]
    fn test_add_constraint_statements() {
        let dialect = PostgresDialect::new();
        assert!(dialect.supports_add_constraint());

        let unique = dialect.add_unique_sql("customers", "uq_customers_customer_id", "customer_id");
        assert_eq!(
            unique,
            "ALTER TABLE \"customers\" ADD CONSTRAINT \"uq_customers_customer_id\" \
             UNIQUE (\"customer_id\")"
        );

        let column = ColumnSpec::new("created_by", ColumnType::BigInt).references("users", "id");
        let fk = dialect.add_foreign_key_sql("hot_news", "fk_hot_news_created_by", &column);
        assert_eq!(
            fk,
            "ALTER TABLE \"hot_news\" ADD CONSTRAINT \"fk_hot_news_created_by\" \
             FOREIGN KEY (\"created_by\") REFERENCES \"users\" (\"id\")"
        );
    }

    #[test]
    fn test_decimal_and_json_type_names() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.type_name(&ColumnType::Decimal(10, 2)), "DECIMAL(10, 2)");
        assert_eq!(dialect.type_name(&ColumnType::Json), "JSONB");
    }
}
