//! # Arenaops Runner
//!
//! Process-backed match-runner registry.
//!
//! Spawns one child process per match from a configured command line,
//! tracks the processes in a concurrent map, and reports or terminates
//! them by match id.

pub mod registry;

pub use registry::{ProcessRunnerRegistry, RunnerRegistryConfig};
