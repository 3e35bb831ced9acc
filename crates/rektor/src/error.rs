//! Error types for rektor
//!
//! Every verification failure maps to exactly one [`ErrorKind`], so callers
//! can tell a tampered artifact from a malformed certificate or proof.

use thiserror::Error;

/// Why a verification failed
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed certificate or unsupported key algorithm
    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    /// Inputs were well formed but the signature does not verify
    #[error("Signature invalid: {0}")]
    SignatureInvalid(String),

    /// Malformed verification input (empty signature, wrong key type)
    #[error("Verification error: {0}")]
    Verification(String),

    /// Inclusion proof has the wrong shape for its index and tree size
    #[error("Inclusion proof invalid: {0}")]
    InclusionProofInvalid(String),

    /// Consistency proof has the wrong shape for its tree sizes
    #[error("Consistency proof invalid: {0}")]
    ConsistencyProofInvalid(String),

    /// A well-formed proof reconstructs a different root
    #[error("Root hash mismatch: expected {expected}, computed {actual}")]
    RootMismatch { expected: String, actual: String },

    /// The artifact does not hash to the digest recorded in the log
    #[error("Artifact digest mismatch: logged {expected}, computed {actual}")]
    ArtifactDigestMismatch { expected: String, actual: String },

    /// Malformed digest, hex or base64 input
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Unparsable or unsigned checkpoint
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// The log returned an entry that is not a well-formed hashedrekord
    #[error("Malformed log response: {0}")]
    Response(String),
}

/// Discriminant of [`Error`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CertificateParse,
    SignatureInvalid,
    Verification,
    InclusionProofInvalid,
    ConsistencyProofInvalid,
    RootMismatch,
    ArtifactDigestMismatch,
    Encoding,
    Checkpoint,
    Response,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CertificateParse(_) => ErrorKind::CertificateParse,
            Error::SignatureInvalid(_) => ErrorKind::SignatureInvalid,
            Error::Verification(_) => ErrorKind::Verification,
            Error::InclusionProofInvalid(_) => ErrorKind::InclusionProofInvalid,
            Error::ConsistencyProofInvalid(_) => ErrorKind::ConsistencyProofInvalid,
            Error::RootMismatch { .. } => ErrorKind::RootMismatch,
            Error::ArtifactDigestMismatch { .. } => ErrorKind::ArtifactDigestMismatch,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Checkpoint(_) => ErrorKind::Checkpoint,
            Error::Response(_) => ErrorKind::Response,
        }
    }

    /// Whether the inputs were well formed and a property failed to hold
    ///
    /// `false` only for [`Error::Response`], where the log's data could not be
    /// read in the first place.
    pub fn is_verification_failure(&self) -> bool {
        self.kind() != ErrorKind::Response
    }

    /// Map a Merkle error raised while checking an inclusion proof
    pub(crate) fn from_inclusion(err: rektor_merkle::Error) -> Self {
        Self::from_merkle(err, Error::InclusionProofInvalid)
    }

    /// Map a Merkle error raised while checking a consistency proof
    pub(crate) fn from_consistency(err: rektor_merkle::Error) -> Self {
        Self::from_merkle(err, Error::ConsistencyProofInvalid)
    }

    fn from_merkle(err: rektor_merkle::Error, malformed: fn(String) -> Error) -> Self {
        match err {
            rektor_merkle::Error::RootMismatch { expected, actual } => {
                Error::RootMismatch { expected, actual }
            }
            rektor_merkle::Error::Encoding(e) => e.into(),
            other => malformed(other.to_string()),
        }
    }
}

impl From<rektor_crypto::Error> for Error {
    fn from(err: rektor_crypto::Error) -> Self {
        use rektor_crypto::Error as E;
        match err {
            E::InvalidCertificate(_) | E::UnsupportedAlgorithm(_) | E::Pem(_) | E::Der(_) => {
                Error::CertificateParse(err.to_string())
            }
            E::SignatureInvalid(_) => Error::SignatureInvalid(err.to_string()),
            E::Checkpoint(_) => Error::Checkpoint(err.to_string()),
            E::Verification(_) | E::InvalidKey(_) | E::AwsLc(_) => {
                Error::Verification(err.to_string())
            }
        }
    }
}

impl From<rektor_types::Error> for Error {
    fn from(err: rektor_types::Error) -> Self {
        use rektor_types::Error as E;
        match err {
            E::InvalidEncoding(_) => Error::Encoding(err.to_string()),
            E::InvalidCheckpoint(_) => Error::Checkpoint(err.to_string()),
            E::InvalidEntry(_) => Error::InclusionProofInvalid(err.to_string()),
        }
    }
}

impl From<rektor_rekor::Error> for Error {
    fn from(err: rektor_rekor::Error) -> Self {
        match err {
            rektor_rekor::Error::Types(e) => e.into(),
            other => Error::Response(other.to_string()),
        }
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
