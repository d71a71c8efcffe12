//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use core_kernel::{AdapterHealth, HealthCheckResult};
use serde::Serialize;

use crate::AppState;

/// Plain-text banner served at `/`
pub const ROOT_BANNER: &str = "API FinanciacionHipotecaria.com funcionando";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub mailer: HealthCheckResult,
}

/// Root banner
pub async fn root() -> &'static str {
    ROOT_BANNER
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes the mailer)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mailer = state.leads.mailer().health_check().await;
    let (status, label) = match mailer.status {
        AdapterHealth::Healthy | AdapterHealth::Degraded => (StatusCode::OK, "ready"),
        AdapterHealth::Unhealthy | AdapterHealth::Unknown => {
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(ReadinessResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            mailer,
        }),
    )
}
