//! Canonical netsales table definitions.
//!
//! The single source of truth for the CRM schema: customer and prospect
//! tracking, the product and promo catalogs, coverage-site mapping,
//! support tickets, role-based users, and dashboard news. Tables are
//! ordered so that foreign-key parents precede the tables referencing
//! them; the reconciler processes them in this order.
//!
//! Timestamp columns are nullable and carry no database default — the
//! application stamps them on write, which keeps every column addable on
//! engines that only accept constant defaults in ALTER TABLE.

use crate::schema::{ColumnSpec, ColumnType, DefaultValue, IndexSpec, TableSpec};

fn active_status() -> DefaultValue {
    DefaultValue::String("Active".to_string())
}

fn users() -> TableSpec {
    TableSpec::new(
        "users",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("username", ColumnType::Varchar(50))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(
        ColumnSpec::new("password_hash", ColumnType::Text)
            .not_null()
            .default_value(DefaultValue::String(String::new())),
    )
    .column(ColumnSpec::new("full_name", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("email", ColumnType::Varchar(100)))
    .column(
        ColumnSpec::new("role", ColumnType::Varchar(20))
            .not_null()
            .default_value(DefaultValue::String("sales".to_string())),
    )
    .column(
        ColumnSpec::new("status", ColumnType::Varchar(20))
            .not_null()
            .default_value(active_status()),
    )
    .column(ColumnSpec::new("last_login", ColumnType::Timestamp))
    .index(IndexSpec::new("idx_users_role", vec!["role".to_string()]))
}

fn coverage_sites() -> TableSpec {
    TableSpec::new(
        "coverage_sites",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("site_code", ColumnType::Varchar(30))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(ColumnSpec::new("name", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("region", ColumnType::Varchar(50)))
    .column(ColumnSpec::new("latitude", ColumnType::Double))
    .column(ColumnSpec::new("longitude", ColumnType::Double))
    .column(ColumnSpec::new("capacity", ColumnType::Integer))
    .column(
        ColumnSpec::new("status", ColumnType::Varchar(20))
            .not_null()
            .default_value(DefaultValue::String("Online".to_string())),
    )
    .index(IndexSpec::new(
        "idx_coverage_sites_region",
        vec!["region".to_string()],
    ))
}

fn products() -> TableSpec {
    TableSpec::new(
        "products",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("code", ColumnType::Varchar(30))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(ColumnSpec::new("name", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("category", ColumnType::Varchar(50)))
    .column(ColumnSpec::new("bandwidth_mbps", ColumnType::Integer))
    .column(ColumnSpec::new("monthly_price", ColumnType::Decimal(10, 2)))
    .column(
        ColumnSpec::new("setup_fee", ColumnType::Decimal(10, 2))
            .default_value(DefaultValue::Integer(0)),
    )
    .column(
        ColumnSpec::new("active", ColumnType::Boolean)
            .not_null()
            .default_value(DefaultValue::Bool(true)),
    )
    .index(IndexSpec::new(
        "idx_products_category",
        vec!["category".to_string()],
    ))
}

fn promos() -> TableSpec {
    TableSpec::new(
        "promos",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("code", ColumnType::Varchar(30))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(ColumnSpec::new("title", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("description", ColumnType::Text))
    .column(ColumnSpec::new("product_id", ColumnType::BigInt).references("products", "id"))
    .column(
        ColumnSpec::new("discount_percent", ColumnType::Decimal(5, 2))
            .default_value(DefaultValue::Integer(0)),
    )
    .column(ColumnSpec::new("starts_on", ColumnType::Date))
    .column(ColumnSpec::new("ends_on", ColumnType::Date))
    .column(
        ColumnSpec::new("active", ColumnType::Boolean)
            .not_null()
            .default_value(DefaultValue::Bool(true)),
    )
}

fn customers() -> TableSpec {
    TableSpec::new(
        "customers",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("customer_id", ColumnType::Varchar(30))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(ColumnSpec::new("name", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("phone", ColumnType::Varchar(20)))
    .column(ColumnSpec::new("email", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("address", ColumnType::Text))
    .column(ColumnSpec::new("site_id", ColumnType::BigInt).references("coverage_sites", "id"))
    .column(ColumnSpec::new("product_id", ColumnType::BigInt).references("products", "id"))
    .column(ColumnSpec::new("account_manager", ColumnType::BigInt).references("users", "id"))
    .column(
        ColumnSpec::new("status", ColumnType::Varchar(20))
            .not_null()
            .default_value(active_status()),
    )
    .column(ColumnSpec::new("activated_on", ColumnType::Date))
    .index(IndexSpec::new(
        "idx_customers_site",
        vec!["site_id".to_string()],
    ))
    .index(IndexSpec::new(
        "idx_customers_status",
        vec!["status".to_string()],
    ))
}

fn prospects() -> TableSpec {
    TableSpec::new(
        "prospects",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(ColumnSpec::new("name", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("phone", ColumnType::Varchar(20)))
    .column(ColumnSpec::new("email", ColumnType::Varchar(100)))
    .column(ColumnSpec::new("product_id", ColumnType::BigInt).references("products", "id"))
    .column(ColumnSpec::new("site_id", ColumnType::BigInt).references("coverage_sites", "id"))
    .column(ColumnSpec::new("assigned_to", ColumnType::BigInt).references("users", "id"))
    .column(
        ColumnSpec::new("stage", ColumnType::Varchar(20))
            .not_null()
            .default_value(DefaultValue::String("New".to_string())),
    )
    .column(ColumnSpec::new("notes", ColumnType::Text))
    .index(IndexSpec::new(
        "idx_prospects_assigned",
        vec!["assigned_to".to_string()],
    ))
}

fn support_tickets() -> TableSpec {
    TableSpec::new(
        "support_tickets",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(
        ColumnSpec::new("ticket_no", ColumnType::Varchar(30))
            .not_null()
            .default_value(DefaultValue::String(String::new()))
            .unique(),
    )
    .column(ColumnSpec::new("customer_id", ColumnType::BigInt).references("customers", "id"))
    .column(ColumnSpec::new("opened_by", ColumnType::BigInt).references("users", "id"))
    .column(ColumnSpec::new("subject", ColumnType::Varchar(200)))
    .column(ColumnSpec::new("body", ColumnType::Text))
    .column(
        ColumnSpec::new("priority", ColumnType::Varchar(10))
            .not_null()
            .default_value(DefaultValue::String("Normal".to_string())),
    )
    .column(
        ColumnSpec::new("status", ColumnType::Varchar(20))
            .not_null()
            .default_value(DefaultValue::String("Open".to_string())),
    )
    .column(ColumnSpec::new("opened_at", ColumnType::Timestamp))
    .column(ColumnSpec::new("closed_at", ColumnType::Timestamp))
    .index(IndexSpec::new(
        "idx_support_tickets_customer",
        vec!["customer_id".to_string()],
    ))
    .index(IndexSpec::new(
        "idx_support_tickets_status",
        vec!["status".to_string()],
    ))
}

fn hot_news() -> TableSpec {
    TableSpec::new(
        "hot_news",
        ColumnSpec::new("id", ColumnType::BigInt).auto_increment(),
    )
    .column(ColumnSpec::new("title", ColumnType::Varchar(200)))
    .column(ColumnSpec::new("body", ColumnType::Text))
    .column(ColumnSpec::new("created_by", ColumnType::BigInt).references("users", "id"))
    .column(
        ColumnSpec::new("published", ColumnType::Boolean)
            .not_null()
            .default_value(DefaultValue::Bool(false)),
    )
    .column(ColumnSpec::new("published_on", ColumnType::Date))
}

/// Returns the full netsales table set in reconciliation order.
#[must_use]
pub fn netsales_tables() -> Vec<TableSpec> {
    vec![
        users(),
        coverage_sites(),
        products(),
        promos(),
        customers(),
        prospects(),
        support_tickets(),
        hot_news(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_tables;

    #[test]
    fn test_table_set_is_well_formed() {
        validate_tables(&netsales_tables()).unwrap();
    }

    #[test]
    fn test_parents_precede_children() {
        let tables = netsales_tables();
        let position = |name: &str| tables.iter().position(|t| t.name == name).unwrap();

        assert!(position("users") < position("customers"));
        assert!(position("products") < position("promos"));
        assert!(position("coverage_sites") < position("prospects"));
        assert!(position("customers") < position("support_tickets"));
        assert!(position("users") < position("hot_news"));
    }

    #[test]
    fn test_every_foreign_key_targets_a_declared_table() {
        let tables = netsales_tables();
        for table in &tables {
            for column in &table.columns {
                if let Some(ref fk) = column.references {
                    let parent = tables
                        .iter()
                        .find(|t| t.name == fk.table)
                        .unwrap_or_else(|| panic!("missing parent table '{}'", fk.table));
                    assert!(
                        parent.get_column(&fk.column).is_some(),
                        "missing parent column '{}.{}'",
                        fk.table,
                        fk.column
                    );
                }
            }
        }
    }
}
