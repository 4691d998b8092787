//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
}

/// Liveness and database connectivity check. Reports degraded rather than
/// failing the request when the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        status: if database == "connected" {
            "healthy"
        } else {
            "degraded"
        },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
    })
}
