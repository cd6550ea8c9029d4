use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub backend_api: String,
    pub handoff_store: String,
    pub handoff_backend: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (backend_result, handoff_result) =
        tokio::join!(state.backend.health_check(), state.handoff.health_check());

    let backend_status = if backend_result.is_ok() { "ok" } else { "error" };
    let handoff_status = if handoff_result.is_ok() { "ok" } else { "error" };

    // Calculators keep working without the backend; only saving is affected.
    let status = if backend_result.is_ok() && handoff_result.is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                backend_api: backend_status.to_string(),
                handoff_store: handoff_status.to_string(),
                handoff_backend: state.handoff.backend_name().to_string(),
            },
        }),
    )
}
