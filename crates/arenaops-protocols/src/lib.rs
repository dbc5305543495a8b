//! # Arenaops Protocols
//!
//! Core protocol definitions (traits) for the arenaops control plane.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`ComputeClient`] - Trait for compute-grid client implementations
//! - [`RunnerRegistry`] - Trait for match-runner registry implementations

pub mod compute;
pub mod error;
pub mod runner;

// Re-export core traits and types
pub use compute::{ComputeClient, InferenceRecord, NetworkStats, ProviderInfo};
pub use error::{ComputeError, RunnerError};
pub use runner::{RunnerPhase, RunnerRegistry, RunnerStatus, StopOutcome};
