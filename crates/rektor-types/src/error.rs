//! Error types for rektor-types

use thiserror::Error;

/// Errors that can occur while constructing log value objects
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed digest length, hex or base64 content
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid checkpoint format
    #[error("Invalid checkpoint format: {0}")]
    InvalidCheckpoint(String),

    /// Leaf index outside the tree it claims to belong to
    #[error("Invalid log entry: {0}")]
    InvalidEntry(String),
}

/// Result type for rektor-types operations
pub type Result<T> = std::result::Result<T, Error>;
