//! Rekor v1 API response types
//!
//! These mirror the JSON returned by the server (hex strings, signed integers).
//! Conversion helpers turn them into the checked values in `rektor_types`.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use rektor_types::{decode_hex_hashes, Checkpoint, Sha256Hash, TreeHead};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A log entry from Rekor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// UUID of the entry (the key in the response map)
    #[serde(skip)]
    pub uuid: String,
    /// Base64 of the canonicalized entry body
    pub body: String,
    /// Integrated time (Unix timestamp)
    pub integrated_time: i64,
    /// Log ID (hex-encoded SHA-256 of the log's public key)
    #[serde(rename = "logID")]
    pub log_id: String,
    pub log_index: i64,
    #[serde(default)]
    pub verification: Option<Verification>,
}

/// Verification data for a log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    #[serde(default)]
    pub inclusion_proof: Option<InclusionProof>,
    /// Signed entry timestamp (base64)
    #[serde(default)]
    pub signed_entry_timestamp: Option<String>,
}

/// Inclusion proof as returned by the v1 API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Checkpoint (signed note) the proof was computed against
    pub checkpoint: String,
    /// Audit path, hex-encoded, leaf to root
    pub hashes: Vec<String>,
    pub log_index: i64,
    /// Root hash, hex-encoded
    pub root_hash: String,
    pub tree_size: i64,
}

/// Log info response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInfo {
    /// Root hash of the tree, hex-encoded
    pub root_hash: String,
    /// Signed tree head (checkpoint note)
    pub signed_tree_head: String,
    /// Tree ID
    pub tree_i_d: String,
    pub tree_size: i64,
}

/// Consistency proof response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyProof {
    /// Root hash of the newer tree, hex-encoded
    pub root_hash: String,
    /// Proof hashes, hex-encoded
    #[serde(default)]
    pub hashes: Vec<String>,
}

/// Entries response (map of UUID to LogEntry)
pub type LogEntryResponse = HashMap<String, LogEntry>;

/// Convert a signed API integer into an unsigned size or index
pub fn to_u64(value: i64, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| Error::InvalidResponse(format!("{} must not be negative, got {}", what, value)))
}

impl LogEntry {
    /// Decode the canonicalized body the log hashed as the leaf
    pub fn decoded_body(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.body)
            .map_err(|e| Error::InvalidResponse(format!("entry body is not base64: {}", e)))
    }

    /// The inclusion proof, which Rekor attaches to every entry it returns
    pub fn inclusion_proof(&self) -> Result<&InclusionProof> {
        self.verification
            .as_ref()
            .and_then(|v| v.inclusion_proof.as_ref())
            .ok_or_else(|| {
                Error::InvalidResponse(format!("entry {} has no inclusion proof", self.log_index))
            })
    }
}

impl InclusionProof {
    pub fn log_index(&self) -> Result<u64> {
        to_u64(self.log_index, "log index")
    }

    pub fn audit_path(&self) -> Result<Vec<Sha256Hash>> {
        Ok(decode_hex_hashes(&self.hashes)?)
    }

    pub fn tree_head(&self) -> Result<TreeHead> {
        Ok(TreeHead::new(
            to_u64(self.tree_size, "tree size")?,
            Sha256Hash::from_hex(&self.root_hash)?,
        ))
    }

    pub fn checkpoint(&self) -> Result<Checkpoint> {
        Ok(Checkpoint::from_text(&self.checkpoint)?)
    }
}

impl LogInfo {
    pub fn tree_head(&self) -> Result<TreeHead> {
        Ok(TreeHead::new(
            to_u64(self.tree_size, "tree size")?,
            Sha256Hash::from_hex(&self.root_hash)?,
        ))
    }

    pub fn checkpoint(&self) -> Result<Checkpoint> {
        Ok(Checkpoint::from_text(&self.signed_tree_head)?)
    }
}

impl ConsistencyProof {
    pub fn hashes(&self) -> Result<Vec<Sha256Hash>> {
        Ok(decode_hex_hashes(&self.hashes)?)
    }

    pub fn root_hash(&self) -> Result<Sha256Hash> {
        Ok(Sha256Hash::from_hex(&self.root_hash)?)
    }
}
