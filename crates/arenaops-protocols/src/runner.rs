//! Match-runner registry protocol.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Lifecycle phase of a match runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerPhase {
    /// Process spawned, not yet confirmed running.
    Starting,
    /// Process is live.
    Running,
    /// Process exited on its own with success.
    Exited,
    /// Process was terminated on request.
    Stopped,
    /// Process exited with a failure or could not be polled.
    Failed,
}

/// State of one match runner, keyed by match id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerStatus {
    /// Caller-supplied match identifier, assumed unique.
    pub match_id: String,

    /// OS process id while the runner is live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Current lifecycle phase.
    pub phase: RunnerPhase,

    /// When the runner was spawned.
    pub started_at: DateTime<Utc>,

    /// Seconds since spawn.
    pub uptime_seconds: u64,

    /// Exit code once the process has exited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Result of a stop request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopOutcome {
    /// Whether a live runner was actually terminated.
    pub stopped: bool,

    /// The match id the request targeted.
    pub match_id: String,

    /// Explanation when nothing was stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Registry owning match-runner processes.
///
/// Lookup absence is `Ok(None)`, never an error; `Err` means the registry
/// itself failed.
#[async_trait]
pub trait RunnerRegistry: Send + Sync {
    /// Status of a single runner, `None` if the id is unknown.
    async fn runner_status(&self, match_id: &str) -> Result<Option<RunnerStatus>, RunnerError>;

    /// Statuses of all registered runners.
    async fn all_runner_statuses(&self) -> Result<Vec<RunnerStatus>, RunnerError>;

    /// Request termination of a runner.
    ///
    /// `stopped` is false when the id is unknown or the runner already
    /// exited - a normal outcome, not an error.
    async fn stop_runner(&self, match_id: &str) -> Result<StopOutcome, RunnerError>;

    /// Spawn a runner for a match and register it.
    async fn launch_runner(&self, match_id: &str) -> Result<RunnerStatus, RunnerError>;
}
