//! netsales-schema CLI
//!
//! Command-line tool for provisioning the netsales database schema.

use clap::{Parser, Subcommand};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use netsales_schema::prelude::*;

/// Idempotent schema provisioning for the netsales CRM database.
#[derive(Parser)]
#[command(name = "netsales-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:netsales.db")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring the live schema up to date with the declared tables.
    Reconcile {
        /// Seed default rows (administrator account, welcome item) after
        /// a clean run.
        #[arg(long)]
        seed: bool,

        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the DDL a reconcile run would issue, without executing it.
    Plan {
        /// Render the plan for PostgreSQL instead of SQLite.
        #[arg(long)]
        postgres: bool,
    },

    /// Show drift between the declared tables and the live schema.
    Status {
        /// Emit the status as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn print_report(report: &ReconciliationReport) {
    for table in &report.created_tables {
        println!(" [+] table {table}");
    }
    for column in &report.added_columns {
        println!(" [+] column {column}");
    }
    for constraint in &report.added_constraints {
        println!(" [+] constraint {constraint}");
    }
    for index in &report.created_indexes {
        println!(" [+] index {index}");
    }
    for error in &report.errors {
        println!(" [!] {} {}: {}", error.kind, error.item, error.reason);
    }

    if report.is_noop() {
        println!("Schema is up to date.");
    } else {
        println!(
            "\n{} change(s) applied, {} error(s).",
            report.changes(),
            report.errors.len()
        );
    }
}

fn print_status(status: &SchemaStatus) {
    if status.in_sync {
        println!("Schema is in sync.");
        return;
    }

    for table in &status.missing_tables {
        println!(" [ ] table {table}");
    }
    for column in &status.missing_columns {
        println!(" [ ] column {column}");
    }
    for constraint in &status.missing_constraints {
        println!(" [ ] constraint {constraint}");
    }
    for index in &status.missing_indexes {
        println!(" [ ] index {index}");
    }
    println!(
        "\n{} item(s) missing.",
        status.missing_tables.len()
            + status.missing_columns.len()
            + status.missing_constraints.len()
            + status.missing_indexes.len()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Connect to database
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&cli.database)
        .await?;

    let tables = netsales_tables();

    match cli.command {
        Commands::Reconcile { seed, json } => {
            let reconciler = Reconciler::new(pool.clone(), SqliteDialect::new());
            let report = reconciler.reconcile(&tables).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if seed {
                let seeded = seed_defaults(&pool).await?;
                if seeded.is_empty() {
                    info!("Default rows already present");
                } else {
                    for row in &seeded {
                        println!(" [+] seeded {row}");
                    }
                }
            }
        }

        Commands::Plan { postgres } => {
            let statements = if postgres {
                Reconciler::new(pool, PostgresDialect::new())
                    .plan(&tables)
                    .await?
            } else {
                Reconciler::new(pool, SqliteDialect::new())
                    .plan(&tables)
                    .await?
            };

            if statements.is_empty() {
                println!("-- nothing to do");
            }
            for sql in statements {
                println!("{sql};");
            }
        }

        Commands::Status { json } => {
            let reconciler = Reconciler::new(pool, SqliteDialect::new());
            let status = reconciler.status(&tables).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}
