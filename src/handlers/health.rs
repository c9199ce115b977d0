//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::store::PgTokenStore;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

/// GET /health - Report token store connectivity
pub async fn health_check(State(store): State<PgTokenStore>) -> Json<HealthResponse> {
    let (status, database) = match store.ping().await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            ("unhealthy", "unavailable".to_string())
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
