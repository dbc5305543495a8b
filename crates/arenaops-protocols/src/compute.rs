//! Compute-grid client protocol.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Aggregate compute-network statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// Chain the grid settles on.
    pub chain_id: u64,

    /// Latest settlement block observed.
    pub block_height: u64,

    /// Providers currently accepting work.
    pub providers_online: u64,

    /// Inferences settled network-wide.
    pub total_inferences: u64,

    /// Average end-to-end latency in milliseconds.
    pub avg_latency_ms: f64,
}

/// A single compute provider listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    /// Provider settlement address.
    pub address: String,

    /// Model the provider serves.
    pub model: String,

    /// Price per token in the grid's smallest denomination.
    pub price_per_token: u64,

    /// Whether the provider passed verification.
    pub verified: bool,
}

/// One entry of the bounded inference history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRecord {
    /// Request identifier assigned by the gateway.
    pub id: String,

    /// Provider that served the inference.
    pub provider: String,

    /// Model used.
    pub model: String,

    /// Tokens in the prompt.
    pub prompt_tokens: u32,

    /// Tokens generated.
    pub completion_tokens: u32,

    /// End-to-end latency in milliseconds.
    pub latency_ms: u64,

    /// When the inference settled.
    pub timestamp: DateTime<Utc>,
}

/// Client for the distributed compute/inference network.
///
/// `network_stats` and `providers` hit the network; `is_connected` and
/// `inference_log` are non-blocking reads of local state.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Whether the most recent network fetch succeeded.
    fn is_connected(&self) -> bool;

    /// Fetch aggregate network statistics.
    async fn network_stats(&self) -> Result<NetworkStats, ComputeError>;

    /// Fetch the current provider listing.
    async fn providers(&self) -> Result<Vec<ProviderInfo>, ComputeError>;

    /// Recent inference history, most recent first.
    fn inference_log(&self) -> Vec<InferenceRecord>;
}
