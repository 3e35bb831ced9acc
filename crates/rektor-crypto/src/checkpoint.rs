//! Checkpoint signature verification
//!
//! A checkpoint may carry several signatures. The one belonging to the log is
//! located by its key hint, the first 4 bytes of SHA-256 over the log's
//! DER-encoded SubjectPublicKeyInfo, and must verify over the note body.

use crate::error::{Error, Result};
use crate::hash::sha256;
use crate::verification::PublicKey;
use rektor_types::Checkpoint;

/// Compute the key hint (4-byte key ID) for a DER-encoded public key
pub fn compute_key_hint(public_key_der: &[u8]) -> [u8; 4] {
    let hash = sha256(public_key_der);
    let bytes = hash.as_bytes();
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// Verify that `checkpoint` is signed by the log key `log_public_key_der`
pub fn verify_checkpoint(checkpoint: &Checkpoint, log_public_key_der: &[u8]) -> Result<()> {
    let key = PublicKey::from_spki_der(log_public_key_der)?;
    verify_checkpoint_with_key(checkpoint, &key)
}

/// Verify that `checkpoint` is signed by `log_key`
pub fn verify_checkpoint_with_key(checkpoint: &Checkpoint, log_key: &PublicKey) -> Result<()> {
    let key_hint = compute_key_hint(log_key.spki_der());

    let signature = checkpoint.signature_for_key_id(&key_hint).ok_or_else(|| {
        Error::Checkpoint(format!(
            "no signature matches key hint {:02x}{:02x}{:02x}{:02x}",
            key_hint[0], key_hint[1], key_hint[2], key_hint[3]
        ))
    })?;

    log_key.verify(checkpoint.signed_data(), &signature.signature)?;

    tracing::debug!(
        origin = %checkpoint.origin,
        tree_size = checkpoint.tree_size,
        signer = %signature.name,
        "checkpoint signature verified"
    );
    Ok(())
}
