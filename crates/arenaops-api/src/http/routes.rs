//! HTTP route definitions.
//!
//! ## Route Structure
//!
//! ```text
//! /compute
//!   GET  /compute/status - Combined compute-grid status report
//!
//! /runner
//!   GET  /runner/status  - One runner (?matchId={id}) or all runners
//!   POST /runner/stop    - Stop a runner by match id
//!   POST /runner/launch  - Launch a runner for a match
//!
//! /health - Health check
//! /livez  - Liveness probe
//! ```

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::http::handlers::{compute_status, launch_runner, runner_status, stop_runner};
use crate::http::monitoring;
use crate::state::AppState;

/// Create the main router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let compute_routes = Router::new()
        .route("/status", get(compute_status))
        .with_state(state.clone());

    let runner_routes = Router::new()
        .route("/status", get(runner_status))
        .route("/stop", post(stop_runner))
        .route("/launch", post(launch_runner))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(monitoring::health_check))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    Router::new()
        .nest("/compute", compute_routes)
        .nest("/runner", runner_routes)
        .merge(monitoring_routes)
        .merge(liveness_route)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
