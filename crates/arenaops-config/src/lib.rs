//! # Arenaops Config
//!
//! Configuration management for the arenaops control plane.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ComputeConfig, Config, RunnerConfig, ServerConfig};
