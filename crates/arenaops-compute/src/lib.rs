//! # Arenaops Compute
//!
//! HTTP client for the distributed compute grid.
//!
//! Fetches aggregate statistics and provider listings from the grid
//! gateway and keeps a bounded in-process history of settled inferences.

pub mod client;

pub use client::{GridClientConfig, GridComputeClient};
