//! Fixed-size digest type
//!
//! Rekor's v1 API hands out hex-encoded hashes while checkpoints carry
//! base64. Both decode into [`Sha256Hash`], which fixes the length at
//! compile time so the Merkle code never sees a short digest.

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length in bytes of a SHA-256 digest
pub const SHA256_LEN: usize = 32;

/// SHA-256 hash digest (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash([u8; SHA256_LEN]);

impl Sha256Hash {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SHA256_LEN]) -> Self {
        Sha256Hash(bytes)
    }

    /// Try to create from a byte slice
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SHA256_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidEncoding(format!(
                "SHA-256 hash must be {} bytes, got {}",
                SHA256_LEN,
                bytes.len()
            ))
        })?;
        Ok(Sha256Hash(arr))
    }

    /// Parse from hex-encoded string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))?;
        Self::try_from_slice(&bytes)
    }

    /// Parse from base64-encoded string
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| Error::InvalidEncoding(format!("invalid base64: {}", e)))?;
        Self::try_from_slice(&bytes)
    }

    /// Encode as hex string (lowercase)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as base64 string
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.0
    }

    /// Get as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Hash({})", self.to_hex())
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SHA256_LEN]> for Sha256Hash {
    fn from(bytes: [u8; SHA256_LEN]) -> Self {
        Sha256Hash(bytes)
    }
}

impl std::str::FromStr for Sha256Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

// Serialized as lowercase hex, the form used by the Rekor v1 API.
impl Serialize for Sha256Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Sha256Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Decode a list of hex digests, failing on the first malformed one
pub fn decode_hex_hashes<S: AsRef<str>>(hashes: &[S]) -> Result<Vec<Sha256Hash>> {
    hashes
        .iter()
        .map(|h| Sha256Hash::from_hex(h.as_ref()))
        .collect()
}
