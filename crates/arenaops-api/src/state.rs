//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use arenaops_protocols::{ComputeClient, RunnerRegistry};

/// Application state shared across handlers.
///
/// Collaborators are injected once at construction; handlers hold no
/// state of their own.
pub struct AppState {
    pub compute: Arc<dyn ComputeClient>,
    pub runners: Arc<dyn RunnerRegistry>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(compute: Arc<dyn ComputeClient>, runners: Arc<dyn RunnerRegistry>) -> Self {
        Self {
            compute,
            runners,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
