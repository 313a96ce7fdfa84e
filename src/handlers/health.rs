use axum::{extract::State, Json};
use serde::Serialize;

use crate::db;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub test_data_enabled: bool,
    pub version: String,
}

/// GET /health
pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let database = match &app_state.db_pool {
        Some(pool) => match db::check_health(pool).await {
            Ok(()) => "connected".to_string(),
            Err(e) => format!("error: {}", e),
        },
        None => "not configured".to_string(),
    };

    let status = if database.starts_with("error") {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        test_data_enabled: app_state.executor.test_data_enabled(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
