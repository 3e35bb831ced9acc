//! Error types for rektor-rekor

use thiserror::Error;

/// Errors that can occur in Rekor operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error (connection, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was well-formed JSON but not a usable entry or proof
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A hash, checkpoint or entry in the response failed to decode
    #[error(transparent)]
    Types(#[from] rektor_types::Error),
}

/// Result type for Rekor operations
pub type Result<T> = std::result::Result<T, Error>;
