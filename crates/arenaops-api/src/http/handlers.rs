//! Control-plane API handlers.
//!
//! Status and lifecycle endpoints over the runner registry and the
//! compute-grid client.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use arenaops_protocols::{
    InferenceRecord, NetworkStats, ProviderInfo, RunnerError, RunnerStatus, StopOutcome,
};

use crate::state::AppState;

/// Providers shown in a compute status report.
const MAX_PROVIDERS: usize = 5;

/// Inference records shown in a compute status report.
const MAX_RECENT_INFERENCES: usize = 10;

// Fallback error text, deliberately distinct per endpoint.
const COMPUTE_STATUS_FALLBACK: &str = "Failed to fetch compute status";
const RUNNER_STATUS_FALLBACK: &str = "Failed to fetch status";
const RUNNER_STOP_FALLBACK: &str = "Failed to stop runner";
const RUNNER_LAUNCH_FALLBACK: &str = "Failed to launch runner";

const MISSING_MATCH_ID: &str = "Missing required field: matchId";

/// Combined compute-grid status report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeStatusResponse {
    pub status: &'static str,
    pub connected: bool,
    pub network: NetworkStats,
    pub providers: Vec<ProviderInfo>,
    pub recent_inferences: Vec<InferenceRecord>,
}

/// Status of a single runner. `runner` is null when the id is unknown.
#[derive(Debug, Serialize)]
pub struct SingleRunnerResponse {
    pub status: &'static str,
    pub runner: Option<RunnerStatus>,
}

/// Statuses of all registered runners.
#[derive(Debug, Serialize)]
pub struct AllRunnersResponse {
    pub status: &'static str,
    pub runners: Vec<RunnerStatus>,
}

/// Stop response: the outcome fields sit alongside the status tag.
#[derive(Debug, Serialize)]
pub struct StopRunnerResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: StopOutcome,
}

/// Launch response.
#[derive(Debug, Serialize)]
pub struct LaunchRunnerResponse {
    pub status: &'static str,
    pub runner: RunnerStatus,
}

/// Uniform error body for collaborator failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    /// Use the error's message, or the endpoint fallback when it is empty.
    fn from_err(err: impl std::fmt::Display, fallback: &str) -> Self {
        let message = err.to_string();
        Self {
            status: "error",
            error: if message.is_empty() {
                fallback.to_string()
            } else {
                message
            },
        }
    }
}

/// Validation error body. Never carries a `status` tag.
#[derive(Debug, Serialize)]
pub struct ValidationError {
    pub error: String,
}

/// Query parameters for the runner status endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerStatusQuery {
    pub match_id: Option<String>,
}

/// Request to stop a match runner.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRunnerRequest {
    pub match_id: Option<String>,
}

/// Request to launch a match runner.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRunnerRequest {
    pub match_id: Option<String>,
}

fn missing_match_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationError {
            error: MISSING_MATCH_ID.to_string(),
        }),
    )
        .into_response()
}

/// Combined compute-grid status report.
///
/// GET /compute/status
///
/// Stats and providers are fetched concurrently; either failing fails the
/// whole request. The connection flag and inference log are local reads.
pub async fn compute_status(State(state): State<Arc<AppState>>) -> Response {
    state.increment_requests();

    let stats = state.compute.network_stats();
    let providers = state.compute.providers();

    match tokio::try_join!(stats, providers) {
        Ok((network, mut providers)) => {
            providers.truncate(MAX_PROVIDERS);
            let mut recent_inferences = state.compute.inference_log();
            recent_inferences.truncate(MAX_RECENT_INFERENCES);

            (
                StatusCode::OK,
                Json(ComputeStatusResponse {
                    status: "ok",
                    connected: state.compute.is_connected(),
                    network,
                    providers,
                    recent_inferences,
                }),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::from_err(e, COMPUTE_STATUS_FALLBACK)),
        )
            .into_response(),
    }
}

/// Runner status by match id, or all runners when no id is given.
///
/// GET /runner/status?matchId={id}
///
/// An unknown id is a normal outcome, reported as `not_found` inside a
/// 200 response.
pub async fn runner_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunnerStatusQuery>,
) -> Response {
    state.increment_requests();

    match query.match_id {
        Some(match_id) => match state.runners.runner_status(&match_id).await {
            Ok(Some(runner)) => (
                StatusCode::OK,
                Json(SingleRunnerResponse {
                    status: "ok",
                    runner: Some(runner),
                }),
            )
                .into_response(),
            Ok(None) => (
                StatusCode::OK,
                Json(SingleRunnerResponse {
                    status: "not_found",
                    runner: None,
                }),
            )
                .into_response(),
            Err(e) => {
                error!("Failed to query runner {}: {}", match_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::from_err(e, RUNNER_STATUS_FALLBACK)),
                )
                    .into_response()
            }
        },
        None => match state.runners.all_runner_statuses().await {
            Ok(runners) => (
                StatusCode::OK,
                Json(AllRunnersResponse {
                    status: "ok",
                    runners,
                }),
            )
                .into_response(),
            Err(e) => {
                error!("Failed to query runners: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::from_err(e, RUNNER_STATUS_FALLBACK)),
                )
                    .into_response()
            }
        },
    }
}

/// Stop a match runner.
///
/// POST /runner/stop
///
/// A missing match id is rejected before the registry is consulted. An
/// unknown or already-exited runner reports `not_found` inside a 200.
pub async fn stop_runner(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StopRunnerRequest>,
) -> Response {
    state.increment_requests();

    let Some(match_id) = req.match_id else {
        return missing_match_id();
    };

    info!("Stop requested for match {}", match_id);

    match state.runners.stop_runner(&match_id).await {
        Ok(outcome) => {
            let status = if outcome.stopped { "stopped" } else { "not_found" };
            (StatusCode::OK, Json(StopRunnerResponse { status, outcome })).into_response()
        }
        Err(e) => {
            error!("Failed to stop runner {}: {}", match_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from_err(e, RUNNER_STOP_FALLBACK)),
            )
                .into_response()
        }
    }
}

/// Launch a match runner.
///
/// POST /runner/launch
pub async fn launch_runner(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LaunchRunnerRequest>,
) -> Response {
    state.increment_requests();

    let Some(match_id) = req.match_id else {
        return missing_match_id();
    };

    info!("Launch requested for match {}", match_id);

    match state.runners.launch_runner(&match_id).await {
        Ok(runner) => (
            StatusCode::CREATED,
            Json(LaunchRunnerResponse {
                status: "launched",
                runner,
            }),
        )
            .into_response(),
        Err(e @ RunnerError::AlreadyRunning(_)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::from_err(e, RUNNER_LAUNCH_FALLBACK)),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to launch runner {}: {}", match_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from_err(e, RUNNER_LAUNCH_FALLBACK)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
