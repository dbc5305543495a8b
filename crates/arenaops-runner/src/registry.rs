//! Process registry for match runners.

use std::process::Stdio;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use arenaops_protocols::{RunnerError, RunnerPhase, RunnerRegistry, RunnerStatus, StopOutcome};

/// Configuration for the process registry.
#[derive(Debug, Clone)]
pub struct RunnerRegistryConfig {
    /// Executable launched for each match.
    pub command: String,

    /// Arguments passed before the match id.
    pub args: Vec<String>,

    /// Maximum simultaneously live runners.
    pub max_concurrent: usize,
}

impl Default for RunnerRegistryConfig {
    fn default() -> Self {
        Self {
            command: "match-runner".to_string(),
            args: Vec::new(),
            max_concurrent: 16,
        }
    }
}

/// Handle for one spawned match runner.
struct RunnerHandle {
    child: Option<Child>,
    pid: Option<u32>,
    phase: RunnerPhase,
    started_at: DateTime<Utc>,
    exit_code: Option<i32>,
}

impl RunnerHandle {
    fn new(child: Child) -> Self {
        let pid = child.id();
        Self {
            child: Some(child),
            pid,
            phase: RunnerPhase::Running,
            started_at: Utc::now(),
            exit_code: None,
        }
    }

    /// Refresh phase from the child without blocking.
    fn refresh(&mut self) {
        if let Some(child) = &mut self.child {
            match child.try_wait() {
                Ok(Some(status)) => {
                    self.exit_code = status.code();
                    self.phase = if status.success() {
                        RunnerPhase::Exited
                    } else {
                        RunnerPhase::Failed
                    };
                    self.child = None;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to poll runner process: {}", e);
                    self.phase = RunnerPhase::Failed;
                    self.child = None;
                }
            }
        }
    }

    fn is_live(&self) -> bool {
        matches!(self.phase, RunnerPhase::Starting | RunnerPhase::Running)
    }

    fn status(&self, match_id: &str) -> RunnerStatus {
        let uptime = (Utc::now() - self.started_at).num_seconds().max(0) as u64;
        RunnerStatus {
            match_id: match_id.to_string(),
            pid: self.pid,
            phase: self.phase,
            started_at: self.started_at,
            uptime_seconds: uptime,
            exit_code: self.exit_code,
        }
    }
}

/// Registry spawning and tracking match-runner child processes.
///
/// Runners are keyed by caller-supplied match id. Stopped entries are
/// removed from the map; exited entries stay visible until stopped.
pub struct ProcessRunnerRegistry {
    config: RunnerRegistryConfig,
    runners: DashMap<String, RunnerHandle>,
}

impl ProcessRunnerRegistry {
    /// Create a new registry.
    pub fn new(config: RunnerRegistryConfig) -> Self {
        Self {
            config,
            runners: DashMap::new(),
        }
    }

    /// Number of registered runners, live or exited.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Whether the registry holds no runners.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    fn live_count(&self) -> usize {
        let mut live = 0;
        for mut entry in self.runners.iter_mut() {
            entry.refresh();
            if entry.is_live() {
                live += 1;
            }
        }
        live
    }

    fn spawn_process(&self, match_id: &str) -> Result<Child, RunnerError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .arg(match_id)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.spawn()
            .map_err(|e| RunnerError::SpawnFailed(e.to_string()))
    }
}

#[async_trait]
impl RunnerRegistry for ProcessRunnerRegistry {
    async fn runner_status(&self, match_id: &str) -> Result<Option<RunnerStatus>, RunnerError> {
        Ok(self.runners.get_mut(match_id).map(|mut handle| {
            handle.refresh();
            handle.status(match_id)
        }))
    }

    async fn all_runner_statuses(&self) -> Result<Vec<RunnerStatus>, RunnerError> {
        let mut statuses = Vec::with_capacity(self.runners.len());
        for mut entry in self.runners.iter_mut() {
            entry.refresh();
            let match_id = entry.key().clone();
            statuses.push(entry.status(&match_id));
        }
        Ok(statuses)
    }

    async fn stop_runner(&self, match_id: &str) -> Result<StopOutcome, RunnerError> {
        let Some((_, mut handle)) = self.runners.remove(match_id) else {
            return Ok(StopOutcome {
                stopped: false,
                match_id: match_id.to_string(),
                message: Some("No runner registered for match".to_string()),
            });
        };

        handle.refresh();
        match handle.child.as_mut() {
            Some(child) => {
                child
                    .kill()
                    .await
                    .map_err(|e| RunnerError::SignalFailed(e.to_string()))?;
                info!("Stopped runner for match {}", match_id);
                Ok(StopOutcome {
                    stopped: true,
                    match_id: match_id.to_string(),
                    message: None,
                })
            }
            None => Ok(StopOutcome {
                stopped: false,
                match_id: match_id.to_string(),
                message: Some("Runner already exited".to_string()),
            }),
        }
    }

    async fn launch_runner(&self, match_id: &str) -> Result<RunnerStatus, RunnerError> {
        if let Some(mut existing) = self.runners.get_mut(match_id) {
            existing.refresh();
            if existing.is_live() {
                return Err(RunnerError::AlreadyRunning(match_id.to_string()));
            }
        }

        if self.live_count() >= self.config.max_concurrent {
            return Err(RunnerError::CapacityExhausted {
                limit: self.config.max_concurrent,
            });
        }

        let child = self.spawn_process(match_id)?;
        let handle = RunnerHandle::new(child);
        let status = handle.status(match_id);
        info!(
            "Launched runner for match {} (pid {:?})",
            match_id, status.pid
        );
        self.runners.insert(match_id.to_string(), handle);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Registry whose runners block until killed.
    fn sleeping_registry(max_concurrent: usize) -> ProcessRunnerRegistry {
        ProcessRunnerRegistry::new(RunnerRegistryConfig {
            command: "sh".to_string(),
            // The match id lands in $0, the runner just blocks.
            args: vec!["-c".to_string(), "sleep 30".to_string()],
            max_concurrent,
        })
    }

    /// Registry whose runners exit immediately.
    fn exiting_registry(exit_code: u8) -> ProcessRunnerRegistry {
        ProcessRunnerRegistry::new(RunnerRegistryConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), format!("exit {}", exit_code)],
            max_concurrent: 16,
        })
    }

    #[tokio::test]
    async fn test_launch_and_status() {
        let registry = sleeping_registry(16);
        let status = registry.launch_runner("match-1").await.unwrap();
        assert_eq!(status.match_id, "match-1");
        assert_eq!(status.phase, RunnerPhase::Running);
        assert!(status.pid.is_some());

        let looked_up = registry.runner_status("match-1").await.unwrap();
        assert_eq!(looked_up.unwrap().phase, RunnerPhase::Running);

        // Clean up the child
        registry.stop_runner("match-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_status_unknown_match_is_none() {
        let registry = sleeping_registry(16);
        let status = registry.runner_status("nonexistent").await.unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn test_all_statuses() {
        let registry = sleeping_registry(16);
        registry.launch_runner("match-1").await.unwrap();
        registry.launch_runner("match-2").await.unwrap();

        let statuses = registry.all_runner_statuses().await.unwrap();
        assert_eq!(statuses.len(), 2);
        let mut ids: Vec<_> = statuses.iter().map(|s| s.match_id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["match-1", "match-2"]);

        registry.stop_runner("match-1").await.unwrap();
        registry.stop_runner("match-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_live_runner() {
        let registry = sleeping_registry(16);
        registry.launch_runner("match-1").await.unwrap();

        let outcome = registry.stop_runner("match-1").await.unwrap();
        assert!(outcome.stopped);
        assert_eq!(outcome.match_id, "match-1");
        assert!(outcome.message.is_none());

        // Stopped entries leave the registry
        assert!(registry.runner_status("match-1").await.unwrap().is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unknown_runner() {
        let registry = sleeping_registry(16);
        let outcome = registry.stop_runner("nonexistent").await.unwrap();
        assert!(!outcome.stopped);
        assert!(outcome.message.is_some());
    }

    #[tokio::test]
    async fn test_stop_exited_runner() {
        let registry = exiting_registry(0);
        registry.launch_runner("match-1").await.unwrap();

        // Give the child time to exit
        tokio::time::sleep(Duration::from_millis(300)).await;

        let outcome = registry.stop_runner("match-1").await.unwrap();
        assert!(!outcome.stopped);
        assert_eq!(outcome.message.as_deref(), Some("Runner already exited"));
    }

    #[tokio::test]
    async fn test_exited_runner_reports_exit_code() {
        let registry = exiting_registry(3);
        registry.launch_runner("match-1").await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        let status = registry.runner_status("match-1").await.unwrap().unwrap();
        assert_eq!(status.phase, RunnerPhase::Failed);
        assert_eq!(status.exit_code, Some(3));

        registry.stop_runner("match-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_launch_rejected() {
        let registry = sleeping_registry(16);
        registry.launch_runner("match-1").await.unwrap();

        let result = registry.launch_runner("match-1").await;
        assert!(matches!(result, Err(RunnerError::AlreadyRunning(_))));

        registry.stop_runner("match-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_relaunch_after_exit() {
        let registry = exiting_registry(0);
        registry.launch_runner("match-1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        // The previous runner exited, so the same id can launch again
        let status = registry.launch_runner("match-1").await.unwrap();
        assert_eq!(status.phase, RunnerPhase::Running);

        registry.stop_runner("match-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_capacity_exhausted() {
        let registry = sleeping_registry(1);
        registry.launch_runner("match-1").await.unwrap();

        let result = registry.launch_runner("match-2").await;
        assert!(matches!(
            result,
            Err(RunnerError::CapacityExhausted { limit: 1 })
        ));

        registry.stop_runner("match-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let registry = ProcessRunnerRegistry::new(RunnerRegistryConfig {
            command: "arenaops-no-such-binary".to_string(),
            args: Vec::new(),
            max_concurrent: 16,
        });

        let result = registry.launch_runner("match-1").await;
        assert!(matches!(result, Err(RunnerError::SpawnFailed(_))));
        assert!(registry.is_empty());
    }
}
