//! Checkpoint (signed tree head) types
//!
//! A checkpoint is a signed note committing to the size and root hash of a
//! transparency log. Format specified in:
//! https://github.com/transparency-dev/formats/blob/main/log/README.md
//!
//! ```text
//! <origin>
//! <tree_size>
//! <root_hash_base64>
//! [other_content...]
//!
//! — <name> <base64(key_id || signature)>
//! ```

use crate::encoding::Sha256Hash;
use crate::error::{Error, Result};
use crate::log::TreeHead;
use base64::{engine::general_purpose::STANDARD, Engine};

const EM_DASH: char = '\u{2014}';

/// A checkpoint (signed tree head) from a transparency log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// The origin string identifying the log
    pub origin: String,
    /// Tree size (number of leaves)
    pub tree_size: u64,
    /// Root hash of the Merkle tree
    pub root_hash: Sha256Hash,
    /// Extension lines after the root hash (e.g. "Timestamp: ...")
    pub other_content: Vec<String>,
    /// Signatures over the note body
    pub signatures: Vec<CheckpointSignature>,
    body: String,
}

/// A signature line of a checkpoint note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointSignature {
    /// Signer name following the em dash
    pub name: String,
    /// First 4 bytes of SHA-256 over the signer's public key
    pub key_id: [u8; 4],
    /// Signature bytes
    pub signature: Vec<u8>,
}

impl Checkpoint {
    /// Parse a checkpoint from its signed-note text representation
    pub fn from_text(text: &str) -> Result<Self> {
        let (body, sig_block) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::InvalidCheckpoint("missing blank line separator".to_string()))?;

        let mut lines = body.lines();

        let origin = lines
            .next()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .ok_or_else(|| Error::InvalidCheckpoint("missing origin".to_string()))?
            .to_string();

        let tree_size = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing tree size".to_string()))?
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCheckpoint("invalid tree size".to_string()))?;

        let root_hash_b64 = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing root hash".to_string()))?;
        let root_hash = Sha256Hash::from_base64(root_hash_b64.trim())
            .map_err(|e| Error::InvalidCheckpoint(format!("invalid root hash: {}", e)))?;

        let other_content = lines
            .map(|l| l.to_string())
            .filter(|l| !l.is_empty())
            .collect();

        let signatures = sig_block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(CheckpointSignature::from_line)
            .collect::<Result<Vec<_>>>()?;

        if signatures.is_empty() {
            return Err(Error::InvalidCheckpoint("no signatures found".to_string()));
        }

        Ok(Checkpoint {
            origin,
            tree_size,
            root_hash,
            other_content,
            signatures,
            body: format!("{}\n", body),
        })
    }

    /// The bytes covered by the checkpoint signatures
    pub fn signed_data(&self) -> &[u8] {
        self.body.as_bytes()
    }

    /// The comparable `(tree size, root hash)` pair
    pub fn tree_head(&self) -> TreeHead {
        TreeHead::new(self.tree_size, self.root_hash)
    }

    /// Find a signature matching the given key hint
    pub fn signature_for_key_id(&self, key_id: &[u8; 4]) -> Option<&CheckpointSignature> {
        self.signatures.iter().find(|sig| &sig.key_id == key_id)
    }
}

impl CheckpointSignature {
    /// Parse a `— <name> <base64>` signature line
    pub fn from_line(line: &str) -> Result<Self> {
        let content = line
            .strip_prefix(EM_DASH)
            .ok_or_else(|| {
                Error::InvalidCheckpoint("signature line must start with an em dash".to_string())
            })?
            .trim_start();

        let (name, sig_b64) = content
            .rsplit_once(' ')
            .ok_or_else(|| Error::InvalidCheckpoint("invalid signature line format".to_string()))?;

        let decoded = STANDARD
            .decode(sig_b64)
            .map_err(|_| Error::InvalidCheckpoint("invalid signature base64".to_string()))?;

        if decoded.len() < 5 {
            return Err(Error::InvalidCheckpoint(
                "signature too short for key id".to_string(),
            ));
        }

        let mut key_id = [0u8; 4];
        key_id.copy_from_slice(&decoded[..4]);

        Ok(CheckpointSignature {
            name: name.trim().to_string(),
            key_id,
            signature: decoded[4..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "rekor.sigstore.dev - 2605736670972794746\n23083062\ndauhleYK4YyAdxwwDtR0l0KnSOWZdG2bwqHftlanvcI=\nTimestamp: 1689177396617352539\n\n— rekor.sigstore.dev xNI9ajBFAiBxaGyEtxkzFLkaCSEJqFuSS3dJjEZCNiyByVs1CNVQ8gIhAOoNnXtmMtTctV2oRnSRUZAo4EWUYPK/vBsqOzAU6TMs\n";

    #[test]
    fn test_parse_checkpoint() {
        let checkpoint = Checkpoint::from_text(NOTE).unwrap();
        assert_eq!(
            checkpoint.origin,
            "rekor.sigstore.dev - 2605736670972794746"
        );
        assert_eq!(checkpoint.tree_size, 23083062);
        assert_eq!(checkpoint.other_content, vec!["Timestamp: 1689177396617352539"]);
        assert_eq!(checkpoint.signatures.len(), 1);
        assert_eq!(checkpoint.signatures[0].name, "rekor.sigstore.dev");
        assert_eq!(checkpoint.signatures[0].key_id, [0xc4, 0xd2, 0x3d, 0x6a]);
    }

    #[test]
    fn test_signed_data_is_body_with_newline() {
        let checkpoint = Checkpoint::from_text(NOTE).unwrap();
        let signed = std::str::from_utf8(checkpoint.signed_data()).unwrap();
        assert!(signed.starts_with("rekor.sigstore.dev"));
        assert!(signed.ends_with("Timestamp: 1689177396617352539\n"));
    }

    #[test]
    fn test_tree_head() {
        let checkpoint = Checkpoint::from_text(NOTE).unwrap();
        let head = checkpoint.tree_head();
        assert_eq!(head.tree_size, 23083062);
        assert_eq!(head.root_hash, checkpoint.root_hash);
    }

    #[test]
    fn test_rejects_unsigned_note() {
        let unsigned = NOTE.split("\n\n").next().unwrap();
        assert!(Checkpoint::from_text(unsigned).is_err());
    }

    #[test]
    fn test_rejects_ascii_dash() {
        let note = NOTE.replace('—', "-");
        assert!(Checkpoint::from_text(&note).is_err());
    }
}
