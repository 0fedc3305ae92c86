use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::models::ConfigStatus;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "cluster",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Outcome of loading in-cluster credentials at startup
#[utoipa::path(
    get,
    path = "/api/config/status",
    tag = "cluster",
    responses(
        (status = 200, description = "Credential load outcome", body = ConfigStatus),
    )
)]
pub async fn config_status(State(state): State<AppState>) -> Json<ConfigStatus> {
    Json(state.cluster().status().clone())
}
