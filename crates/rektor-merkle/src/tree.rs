//! Merkle tree hashing utilities
//!
//! Implements RFC 6962 compliant Merkle tree hashing with:
//! - Domain separation via prefixes (0x00 for leaf, 0x01 for node)
//! - SHA-256 hash function

use crate::error::Result;
use rektor_types::Sha256Hash;
use sha2::{Digest, Sha256};

/// Prefix for leaf nodes in RFC 6962 Merkle tree
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for internal nodes in RFC 6962 Merkle tree
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash size in bytes (SHA-256)
pub const HASH_SIZE: usize = 32;

/// Hash a leaf node
///
/// Returns: SHA256(0x00 || leaf_data)
pub fn hash_leaf(data: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_HASH_PREFIX]);
    hasher.update(data);
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Hash two child nodes to create a parent node
///
/// Returns: SHA256(0x01 || left || right)
pub fn hash_children(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_HASH_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// [`hash_children`] over untyped byte slices
///
/// Fails with an encoding error unless both inputs are exactly
/// [`HASH_SIZE`] bytes.
pub fn try_hash_children(left: &[u8], right: &[u8]) -> Result<Sha256Hash> {
    let left = Sha256Hash::try_from_slice(left)?;
    let right = Sha256Hash::try_from_slice(right)?;
    Ok(hash_children(&left, &right))
}

/// Root hash of a tree with no leaves: SHA256 of the empty string
pub fn empty_root() -> Sha256Hash {
    Sha256Hash::from_bytes(Sha256::digest(b"").into())
}

/// Calculate the position of the most significant bit
pub fn bit_length(n: u64) -> u32 {
    64 - n.leading_zeros()
}
