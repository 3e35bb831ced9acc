//! Error types for rektor-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Inputs were well formed but the signature does not verify
    #[error("Signature invalid: {0}")]
    SignatureInvalid(String),

    /// Verification inputs are malformed (empty signature, wrong digest size)
    #[error("Verification error: {0}")]
    Verification(String),

    /// Key material does not match its declared algorithm
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Unsupported algorithm
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Certificate parsing error
    #[error("Certificate error: {0}")]
    InvalidCertificate(String),

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    Pem(String),

    /// DER encoding/decoding error
    #[error("DER error: {0}")]
    Der(String),

    /// AWS-LC-RS error
    #[error("Crypto error: {0}")]
    AwsLc(String),

    /// Checkpoint signature error
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

impl From<aws_lc_rs::error::Unspecified> for Error {
    fn from(_: aws_lc_rs::error::Unspecified) -> Self {
        Error::AwsLc("unspecified error".to_string())
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKey(e.to_string())
    }
}

impl From<der::Error> for Error {
    fn from(e: der::Error) -> Self {
        Error::Der(e.to_string())
    }
}

impl From<pem::PemError> for Error {
    fn from(e: pem::PemError) -> Self {
        Error::Pem(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
