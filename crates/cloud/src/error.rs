//! Error types for the remote engine client

use thiserror::Error;

/// Errors produced by the engine client and export sink
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("scene payload mismatch: band {band:?} has {got} samples, expected {expected}")]
    PayloadShape {
        band: String,
        expected: usize,
        got: usize,
    },

    #[error("core error: {0}")]
    Core(#[from] terradiff_core::Error),
}

/// Result alias for cloud operations
pub type Result<T> = std::result::Result<T, CloudError>;
