//! System/health API handlers.
//!
//! # Purpose
//! Lightweight endpoints for service metadata and probes. Health must stay
//! fast and side-effect free.
use crate::api::error::{api_internal, ApiError};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity and backends", body = SystemInfo)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    // Built from in-memory configuration; no I/O.
    Json(SystemInfo {
        api_version: state.api_version.clone(),
        store_backend: state.store.backend_name().to_string(),
        cache_backend: state.cache_backend.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "Store unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
