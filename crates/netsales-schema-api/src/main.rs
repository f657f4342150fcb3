//! netsales-schema-api server
//!
//! Serves the schema reconcile/status endpoints.

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use netsales_schema_api::{router, ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:netsales.db".to_string());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database)
        .await?;

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = router(ApiState { pool });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
