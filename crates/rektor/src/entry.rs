//! End-to-end verification of a fetched hashedrekord entry

use crate::error::{Error, Result};
use crate::verify::{extract_public_key, verify_inclusion, verify_signature};
use rektor_crypto::{parse_certificate_info, sha256, SigningScheme};
use rektor_rekor::HashedRekordBody;
use rektor_types::{Checkpoint, LogEntry, Sha256Hash, TreeHead};

/// Everything needed to verify one log entry, already fetched and decoded
#[derive(Debug, Clone)]
pub struct EntryMaterial {
    /// Canonicalized entry body, the exact bytes the log hashed as the leaf
    pub body: Vec<u8>,
    pub log_index: u64,
    pub integrated_time: i64,
    /// Audit path from the leaf to the root of `tree_head`
    pub audit_path: Vec<Sha256Hash>,
    pub tree_head: TreeHead,
    /// Checkpoint the proof was computed against, when the log supplied one
    pub checkpoint: Option<Checkpoint>,
}

impl TryFrom<&rektor_rekor::LogEntry> for EntryMaterial {
    type Error = Error;

    fn try_from(entry: &rektor_rekor::LogEntry) -> Result<Self> {
        let proof = entry.inclusion_proof()?;
        let checkpoint = if proof.checkpoint.trim().is_empty() {
            None
        } else {
            Some(proof.checkpoint()?)
        };

        Ok(Self {
            body: entry.decoded_body()?,
            log_index: proof.log_index()?,
            integrated_time: entry.integrated_time,
            audit_path: proof.audit_path()?,
            tree_head: proof.tree_head()?,
            checkpoint,
        })
    }
}

/// What a successful [`verify_entry`] established
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub log_index: u64,
    pub integrated_time: i64,
    pub leaf_hash: Sha256Hash,
    pub tree_head: TreeHead,
    pub artifact_digest: Sha256Hash,
    pub scheme: SigningScheme,
    /// Email or URI identity of the signing certificate, if it has one
    pub identity: Option<String>,
}

/// Verify a hashedrekord entry against the artifact it claims to cover
///
/// In order: the artifact digest matches the logged digest, the logged
/// signature verifies under the logged certificate, the leaf hash recomputed
/// from the body is included under the proof's root, and the checkpoint
/// (when present) commits to that same root.
pub fn verify_entry(material: &EntryMaterial, artifact: &[u8]) -> Result<Verdict> {
    let body = HashedRekordBody::from_slice(&material.body)?;

    let logged_digest = body.digest()?;
    let artifact_digest = sha256(artifact);
    if logged_digest != artifact_digest {
        return Err(Error::ArtifactDigestMismatch {
            expected: logged_digest.to_hex(),
            actual: artifact_digest.to_hex(),
        });
    }

    let certificate = body.certificate()?;
    let public_key = extract_public_key(&certificate)?;
    let identity = parse_certificate_info(&certificate)
        .map_err(|e| Error::CertificateParse(e.to_string()))?
        .identity;
    verify_signature(&body.signature()?, &public_key, artifact)?;

    let leaf_hash = rektor_merkle::hash_leaf(&material.body);
    let entry = LogEntry::new(
        material.log_index,
        leaf_hash,
        material.audit_path.clone(),
        material.tree_head,
    )?;
    verify_inclusion(&entry)?;

    if let Some(checkpoint) = &material.checkpoint {
        check_checkpoint_matches(checkpoint, &material.tree_head)?;
    }

    Ok(Verdict {
        log_index: material.log_index,
        integrated_time: material.integrated_time,
        leaf_hash,
        tree_head: material.tree_head,
        artifact_digest,
        scheme: public_key.scheme(),
        identity,
    })
}

fn check_checkpoint_matches(checkpoint: &Checkpoint, tree_head: &TreeHead) -> Result<()> {
    if checkpoint.tree_size != tree_head.tree_size {
        return Err(Error::Checkpoint(format!(
            "checkpoint is for tree size {}, proof is for {}",
            checkpoint.tree_size, tree_head.tree_size
        )));
    }
    if checkpoint.root_hash != tree_head.root_hash {
        return Err(Error::RootMismatch {
            expected: checkpoint.root_hash.to_hex(),
            actual: tree_head.root_hash.to_hex(),
        });
    }
    Ok(())
}
