//! Configurable fake collaborators for handler and router tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use arenaops_protocols::{
    ComputeClient, ComputeError, InferenceRecord, NetworkStats, ProviderInfo, RunnerError,
    RunnerPhase, RunnerRegistry, RunnerStatus, StopOutcome,
};

use crate::state::AppState;

/// Fake compute client returning a fixed number of providers and records.
pub(crate) struct FakeCompute {
    pub connected: bool,
    pub provider_count: usize,
    pub inference_count: usize,
    pub fail: bool,
}

impl Default for FakeCompute {
    fn default() -> Self {
        Self {
            connected: true,
            provider_count: 2,
            inference_count: 3,
            fail: false,
        }
    }
}

#[async_trait]
impl ComputeClient for FakeCompute {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn network_stats(&self) -> Result<NetworkStats, ComputeError> {
        if self.fail {
            return Err(ComputeError::Transport("connection refused".to_string()));
        }
        Ok(NetworkStats {
            chain_id: 16600,
            block_height: 1024,
            providers_online: self.provider_count as u64,
            total_inferences: 90_000,
            avg_latency_ms: 412.5,
        })
    }

    async fn providers(&self) -> Result<Vec<ProviderInfo>, ComputeError> {
        if self.fail {
            return Err(ComputeError::Transport("connection refused".to_string()));
        }
        Ok((0..self.provider_count)
            .map(|i| ProviderInfo {
                address: format!("0xprovider{}", i),
                model: "llama-3.3-70b".to_string(),
                price_per_token: 12,
                verified: i % 2 == 0,
            })
            .collect())
    }

    fn inference_log(&self) -> Vec<InferenceRecord> {
        (0..self.inference_count)
            .map(|i| InferenceRecord {
                id: format!("inf-{}", i),
                provider: "0xprovider0".to_string(),
                model: "llama-3.3-70b".to_string(),
                prompt_tokens: 128,
                completion_tokens: 256,
                latency_ms: 900,
                timestamp: Utc::now(),
            })
            .collect()
    }
}

/// Fake runner registry with scripted outcomes. Records stop calls so
/// tests can assert the registry was not consulted.
pub(crate) struct FakeRegistry {
    pub statuses: Vec<RunnerStatus>,
    pub stop_stops: bool,
    pub launch_conflict: bool,
    pub fail: bool,
    pub stop_calls: AtomicUsize,
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self {
            statuses: Vec::new(),
            stop_stops: true,
            launch_conflict: false,
            fail: false,
            stop_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RunnerRegistry for FakeRegistry {
    async fn runner_status(&self, match_id: &str) -> Result<Option<RunnerStatus>, RunnerError> {
        if self.fail {
            return Err(RunnerError::Internal("registry backend down".to_string()));
        }
        Ok(self
            .statuses
            .iter()
            .find(|s| s.match_id == match_id)
            .cloned())
    }

    async fn all_runner_statuses(&self) -> Result<Vec<RunnerStatus>, RunnerError> {
        if self.fail {
            return Err(RunnerError::Internal("registry backend down".to_string()));
        }
        Ok(self.statuses.clone())
    }

    async fn stop_runner(&self, match_id: &str) -> Result<StopOutcome, RunnerError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RunnerError::SignalFailed("kill failed".to_string()));
        }
        Ok(StopOutcome {
            stopped: self.stop_stops,
            match_id: match_id.to_string(),
            message: if self.stop_stops {
                None
            } else {
                Some("No runner registered for match".to_string())
            },
        })
    }

    async fn launch_runner(&self, match_id: &str) -> Result<RunnerStatus, RunnerError> {
        if self.launch_conflict {
            return Err(RunnerError::AlreadyRunning(match_id.to_string()));
        }
        if self.fail {
            return Err(RunnerError::SpawnFailed("spawn failed".to_string()));
        }
        Ok(runner_fixture(match_id))
    }
}

/// A live runner status fixture.
pub(crate) fn runner_fixture(match_id: &str) -> RunnerStatus {
    RunnerStatus {
        match_id: match_id.to_string(),
        pid: Some(4242),
        phase: RunnerPhase::Running,
        started_at: Utc::now(),
        uptime_seconds: 0,
        exit_code: None,
    }
}

/// Build an `AppState` over the fakes, keeping a handle on the registry
/// for call-count assertions.
pub(crate) fn state_with(
    compute: FakeCompute,
    registry: FakeRegistry,
) -> (Arc<AppState>, Arc<FakeRegistry>) {
    let registry = Arc::new(registry);
    let state = Arc::new(AppState::new(Arc::new(compute), registry.clone()));
    (state, registry)
}
