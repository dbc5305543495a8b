//! Protocol error types.

use thiserror::Error;

/// Errors from the compute-grid client.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// Network transport failed.
    #[error("Compute network request failed: {0}")]
    Transport(String),

    /// Response decoding failed.
    #[error("Invalid compute network response: {0}")]
    InvalidResponse(String),

    /// The grid gateway rejected the request.
    #[error("Compute network rejected request: status {0}")]
    Rejected(u16),
}

/// Errors from the runner registry.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A runner with this match id is already live.
    #[error("Runner already running for match: {0}")]
    AlreadyRunning(String),

    /// Spawning the runner process failed.
    #[error("Failed to spawn runner: {0}")]
    SpawnFailed(String),

    /// Signalling the runner process failed.
    #[error("Failed to signal runner: {0}")]
    SignalFailed(String),

    /// Registry capacity exhausted.
    #[error("Runner capacity exhausted: {limit} already running")]
    CapacityExhausted { limit: usize },

    /// Registry internals failed.
    #[error("Runner registry error: {0}")]
    Internal(String),
}
