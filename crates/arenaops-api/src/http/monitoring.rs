//! Monitoring and health check handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy.
    Healthy,
    /// Service is degraded but functional.
    Degraded,
    /// Service is unhealthy.
    Unhealthy,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Version information.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Requests served since start.
    pub requests_served: u64,
    /// Component health checks.
    pub components: Vec<ComponentHealth>,
}

/// Component health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name.
    pub name: String,
    /// Component status.
    pub status: HealthStatus,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check handler.
///
/// Compute health is derived from the client's connectivity flag; runner
/// health from whether the registry answers at all.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (compute_status, compute_message) = if state.compute.is_connected() {
        (HealthStatus::Healthy, None)
    } else {
        (
            HealthStatus::Degraded,
            Some("compute grid unreachable".to_string()),
        )
    };

    let runner_status = match state.runners.all_runner_statuses().await {
        Ok(_) => HealthStatus::Healthy,
        Err(_) => HealthStatus::Unhealthy,
    };

    let components = vec![
        ComponentHealth {
            name: "compute".to_string(),
            status: compute_status,
            message: compute_message,
        },
        ComponentHealth {
            name: "runner".to_string(),
            status: runner_status,
            message: None,
        },
    ];

    // Overall status is the worst component status
    let overall_status = if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if components.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    Json(HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        requests_served: state.request_count(),
        components,
    })
}

/// Liveness probe.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}
