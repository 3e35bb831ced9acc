//! Hashing utilities using aws-lc-rs

use aws_lc_rs::digest::{self, SHA256};
use rektor_types::Sha256Hash;

/// Hash data using SHA-256
pub fn sha256(data: &[u8]) -> Sha256Hash {
    let digest = digest::digest(&SHA256, data);
    let mut result = [0u8; 32];
    result.copy_from_slice(digest.as_ref());
    Sha256Hash::from_bytes(result)
}
