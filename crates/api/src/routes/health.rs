use axum::extract::State;
use axum::{routing::get, Json, Router};
use bcpms_db::Database;
use serde::Serialize;

/// Health check response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
async fn health_check(State(db): State<Database>) -> Json<HealthResponse> {
    let db_healthy = db.health_check().await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (root level, NOT under `/api/v1`).
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(db)
}
