//! Errors from the mem0 service boundary.

use thiserror::Error;

/// Failure of a mem0 search or add.
#[derive(Debug, Error)]
pub enum Mem0Error {
    /// The HTTP client could not be set up at all.
    #[error("mem0 client unavailable: {0}")]
    Unavailable(String),

    /// Transport failure (DNS, connect, timeout, body read).
    #[error("mem0 request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("mem0 API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered with something that is not JSON.
    #[error("mem0 response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Mem0Error>;
