//! Health check controller.

use crate::state::AppState;
use encore_core::HealthStatus;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use futures::future::join_all;
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded or unhealthy.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Per-dependency results.
    pub checks: Vec<ComponentHealth>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

async fn run_checks(state: &AppState) -> Vec<(String, HealthStatus)> {
    join_all(state.health_checks.iter().map(|check| async move {
        (check.name().to_string(), check.check().await)
    }))
    .await
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let results = run_checks(&state).await;

    let status = if results.iter().any(|(_, s)| s.is_unhealthy()) {
        "unhealthy"
    } else if results.iter().any(|(_, s)| !s.is_healthy()) {
        "degraded"
    } else {
        "healthy"
    };

    let checks = results
        .into_iter()
        .map(|(name, status)| {
            let reason = match &status {
                HealthStatus::Healthy => None,
                HealthStatus::Degraded(r) | HealthStatus::Unhealthy(r) => Some(r.clone()),
            };
            ComponentHealth {
                name,
                status: status.label().to_string(),
                reason,
            }
        })
        .collect();

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    })
}

/// Readiness check endpoint. Not ready while any dependency is unhealthy.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if run_checks(&state).await.iter().any(|(_, s)| s.is_unhealthy()) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
