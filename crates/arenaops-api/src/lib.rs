//! # Arenaops API
//!
//! HTTP control-plane surface for arenaops.
//!
//! - **Compute status**: combined compute-grid report (stats, providers,
//!   recent inferences)
//! - **Runner status**: one runner by match id, or all runners
//! - **Runner lifecycle**: launch and stop match runners
//! - **Monitoring**: health and liveness probes
//!
//! Handlers are stateless; they delegate to the collaborators injected
//! into [`AppState`] and map each `Result` onto a JSON response.

pub mod error;
pub mod http;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
