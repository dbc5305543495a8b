//! Compute-grid HTTP client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use arenaops_protocols::{
    ComputeClient, ComputeError, InferenceRecord, NetworkStats, ProviderInfo,
};

/// Configuration for the grid client.
#[derive(Debug, Clone)]
pub struct GridClientConfig {
    /// Base URL of the grid gateway.
    pub base_url: String,

    /// Bearer token for the gateway, if required.
    pub api_token: Option<String>,

    /// Capacity of the inference history.
    pub inference_log_limit: usize,
}

impl Default for GridClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9200".to_string(),
            api_token: None,
            inference_log_limit: 64,
        }
    }
}

/// HTTP client for the compute-grid gateway.
///
/// The connectivity flag reflects the outcome of the most recent fetch.
/// The inference log is owned here and kept most-recent-first.
pub struct GridComputeClient {
    http: reqwest::Client,
    config: GridClientConfig,
    connected: AtomicBool,
    inferences: Mutex<VecDeque<InferenceRecord>>,
}

impl GridComputeClient {
    /// Create a new client. No network traffic until the first fetch.
    pub fn new(config: GridClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            connected: AtomicBool::new(false),
            inferences: Mutex::new(VecDeque::new()),
        }
    }

    /// Record a settled inference into the bounded history.
    pub fn record_inference(&self, record: InferenceRecord) {
        let mut log = self.inferences.lock();
        log.push_front(record);
        log.truncate(self.config.inference_log_limit);
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ComputeError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("Fetching {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            self.connected.store(false, Ordering::Relaxed);
            ComputeError::Transport(e.to_string())
        })?;

        if !response.status().is_success() {
            self.connected.store(false, Ordering::Relaxed);
            return Err(ComputeError::Rejected(response.status().as_u16()));
        }

        let value = response.json::<T>().await.map_err(|e| {
            self.connected.store(false, Ordering::Relaxed);
            ComputeError::InvalidResponse(e.to_string())
        })?;

        self.connected.store(true, Ordering::Relaxed);
        Ok(value)
    }
}

#[async_trait]
impl ComputeClient for GridComputeClient {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn network_stats(&self) -> Result<NetworkStats, ComputeError> {
        self.get_json("/v1/stats").await
    }

    async fn providers(&self) -> Result<Vec<ProviderInfo>, ComputeError> {
        self.get_json("/v1/providers").await
    }

    fn inference_log(&self) -> Vec<InferenceRecord> {
        self.inferences.lock().iter().cloned().collect()
    }
}
