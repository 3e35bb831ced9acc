//! Error types for rektor-merkle

use thiserror::Error;

/// Errors that can occur in Merkle tree operations
#[derive(Error, Debug)]
pub enum Error {
    /// Proof has the wrong shape for the given index and sizes
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    /// Invalid tree size
    #[error("Invalid tree size: {0}")]
    InvalidTreeSize(String),

    /// Invalid leaf index
    #[error("Invalid leaf index: {0}")]
    InvalidLeafIndex(String),

    /// Proof is well-formed but does not reconstruct the expected root
    #[error("Root mismatch: expected {expected}, got {actual}")]
    RootMismatch { expected: String, actual: String },

    /// Digest of the wrong length or encoding
    #[error("Encoding error: {0}")]
    Encoding(#[from] rektor_types::Error),
}

impl Error {
    /// True when the proof could not even be evaluated for the given sizes,
    /// as opposed to evaluating to the wrong root
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::InvalidProof(_) | Error::InvalidTreeSize(_) | Error::InvalidLeafIndex(_)
        )
    }
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
