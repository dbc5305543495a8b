//! API error types.

use thiserror::Error;

/// API server error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid listen address.
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// Socket error.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}
