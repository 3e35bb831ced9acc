//! Cryptographic primitives for Rekor verification
//!
//! Certificate and public key parsing, signature verification and checkpoint
//! signature checks, using aws-lc-rs as the cryptographic backend.

pub mod checkpoint;
pub mod error;
pub mod hash;
#[cfg(any(test, feature = "test-support"))]
pub mod signing;
pub mod verification;
pub mod x509;

pub use checkpoint::{compute_key_hint, verify_checkpoint, verify_checkpoint_with_key};
pub use error::{Error, Result};
pub use hash::sha256;
#[cfg(any(test, feature = "test-support"))]
pub use signing::KeyPair;
pub use verification::{verify_signature, PublicKey, SigningScheme};
pub use x509::{extract_public_key, parse_certificate_info, CertificateInfo};
