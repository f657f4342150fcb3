//! HTTP surface for netsales schema provisioning.
//!
//! Thin collaborator around the reconciler: per-item failures are data in
//! the response body, so a completed run always answers 200 — only a
//! fatal catalog/connectivity failure maps to 500.

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use tracing::error;

use netsales_schema::prelude::*;

/// Shared state for the schema endpoints.
#[derive(Clone)]
pub struct ApiState {
    /// Connection pool the reconciler runs against.
    pub pool: SqlitePool,
}

/// Body of a 500 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub message: String,
}

/// Builds the schema router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/schema/reconcile", post(reconcile))
        .route("/schema/status", get(status))
        .with_state(state)
}

fn internal_error(err: &SchemaError) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %err, "Schema operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
}

/// Runs a reconcile pass and returns the report.
pub async fn reconcile(
    State(state): State<ApiState>,
) -> std::result::Result<Json<ReconciliationReport>, (StatusCode, Json<ErrorResponse>)> {
    let reconciler = Reconciler::new(state.pool.clone(), SqliteDialect::new());
    let report = reconciler
        .reconcile(&netsales_tables())
        .await
        .map_err(|err| internal_error(&err))?;
    Ok(Json(report))
}

/// Returns drift between the declared tables and the live schema.
pub async fn status(
    State(state): State<ApiState>,
) -> std::result::Result<Json<SchemaStatus>, (StatusCode, Json<ErrorResponse>)> {
    let reconciler = Reconciler::new(state.pool.clone(), SqliteDialect::new());
    let status = reconciler
        .status(&netsales_tables())
        .await
        .map_err(|err| internal_error(&err))?;
    Ok(Json(status))
}
