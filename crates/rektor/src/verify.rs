//! Verdict operations
//!
//! Each function returns `Ok(())` when the property holds and an [`Error`]
//! naming the reason otherwise. None of them touch the network.

use crate::error::{Error, Result};
use rektor_crypto::PublicKey;
use rektor_types::{Checkpoint, LogEntry, Sha256Hash, TreeHead};

/// Extract the subject public key from a PEM or DER certificate
pub fn extract_public_key(certificate: &[u8]) -> Result<PublicKey> {
    rektor_crypto::extract_public_key(certificate).map_err(|e| match e {
        rektor_crypto::Error::InvalidKey(_) => Error::CertificateParse(e.to_string()),
        other => other.into(),
    })
}

/// Verify `signature` over `artifact` under `public_key`
pub fn verify_signature(signature: &[u8], public_key: &PublicKey, artifact: &[u8]) -> Result<()> {
    match rektor_crypto::verify_signature(signature, public_key, artifact) {
        Ok(()) => {
            tracing::info!(scheme = %public_key.scheme(), "signature is valid");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(scheme = %public_key.scheme(), error = %e, "signature verification failed");
            Err(e.into())
        }
    }
}

/// Verify that `entry` is included in the tree described by its tree head
pub fn verify_inclusion(entry: &LogEntry) -> Result<()> {
    let head = entry.tree_head();
    rektor_merkle::verify_inclusion_proof(
        entry.leaf_hash(),
        entry.log_index(),
        head.tree_size,
        entry.audit_path(),
        &head.root_hash,
    )
    .map_err(Error::from_inclusion)
    .inspect(|_| {
        tracing::info!(
            log_index = entry.log_index(),
            tree_size = head.tree_size,
            "inclusion verified"
        )
    })
    .inspect_err(|e| {
        tracing::warn!(
            log_index = entry.log_index(),
            tree_size = head.tree_size,
            error = %e,
            "inclusion verification failed"
        )
    })
}

/// Check that a consistency proof from `old` to `new` can exist at all
pub fn check_consistency_sizes(old: &TreeHead, new: &TreeHead) -> Result<()> {
    if old.tree_size == 0 {
        return Err(Error::ConsistencyProofInvalid(
            "older tree size must be greater than zero".to_string(),
        ));
    }
    if !old.precedes(new) {
        return Err(Error::ConsistencyProofInvalid(format!(
            "older tree size {} exceeds newer tree size {}",
            old.tree_size, new.tree_size
        )));
    }
    Ok(())
}

/// Verify that `new` is an append-only extension of `old`
pub fn verify_consistency(old: &TreeHead, new: &TreeHead, proof: &[Sha256Hash]) -> Result<()> {
    check_consistency_sizes(old, new)?;

    rektor_merkle::verify_consistency_proof(
        old.tree_size,
        new.tree_size,
        proof,
        &old.root_hash,
        &new.root_hash,
    )
    .map_err(Error::from_consistency)
    .inspect(|_| {
        tracing::info!(
            old_size = old.tree_size,
            new_size = new.tree_size,
            "consistency verified"
        )
    })
    .inspect_err(|e| {
        tracing::warn!(
            old_size = old.tree_size,
            new_size = new.tree_size,
            error = %e,
            "consistency verification failed"
        )
    })
}

/// Verify that `checkpoint` carries a valid signature by `log_key`
pub fn verify_checkpoint(checkpoint: &Checkpoint, log_key: &PublicKey) -> Result<()> {
    rektor_crypto::verify_checkpoint_with_key(checkpoint, log_key)?;
    tracing::info!(origin = %checkpoint.origin, tree_size = checkpoint.tree_size, "checkpoint signature verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rektor_merkle::MerkleTree;

    fn tree(size: u64) -> MerkleTree {
        MerkleTree::from_leaves((0..size).map(|i| i.to_be_bytes()))
    }

    fn entry(tree: &MerkleTree, index: u64) -> LogEntry {
        LogEntry::new(
            index,
            *tree.leaf_hash(index).unwrap(),
            tree.inclusion_proof(index, tree.len()).unwrap(),
            TreeHead::new(tree.len(), tree.root()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_inclusion() {
        let tree = tree(7);
        for index in 0..7 {
            assert!(verify_inclusion(&entry(&tree, index)).is_ok());
        }
    }

    #[test]
    fn test_inclusion_short_path_is_invalid_proof() {
        let tree = tree(7);
        let honest = entry(&tree, 6);
        let mut path = honest.audit_path().to_vec();
        path.pop();
        let short = LogEntry::new(6, *honest.leaf_hash(), path, *honest.tree_head()).unwrap();

        let err = verify_inclusion(&short).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InclusionProofInvalid);
    }

    #[test]
    fn test_inclusion_wrong_leaf_is_root_mismatch() {
        let tree = tree(8);
        let honest = entry(&tree, 3);
        let forged = LogEntry::new(
            3,
            rektor_merkle::hash_leaf(b"forged"),
            honest.audit_path().to_vec(),
            *honest.tree_head(),
        )
        .unwrap();

        let err = verify_inclusion(&forged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RootMismatch);
    }

    #[test]
    fn test_verify_consistency() {
        let tree = tree(8);
        let old = TreeHead::new(3, tree.root_at(3).unwrap());
        let new = TreeHead::new(8, tree.root());
        let proof = tree.consistency_proof(3, 8).unwrap();
        assert!(verify_consistency(&old, &new, &proof).is_ok());
    }

    #[test]
    fn test_consistency_reversed_heads() {
        let tree = tree(8);
        let old = TreeHead::new(3, tree.root_at(3).unwrap());
        let new = TreeHead::new(8, tree.root());
        let err = verify_consistency(&new, &old, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyProofInvalid);
    }

    #[test]
    fn test_consistency_sizes_checked_without_proof() {
        let latest = TreeHead::new(8, tree(8).root());
        let empty = TreeHead::new(0, rektor_merkle::empty_root());
        let ahead = TreeHead::new(9, tree(9).root());

        for old in [&empty, &ahead] {
            let err = check_consistency_sizes(old, &latest).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConsistencyProofInvalid);
            let err = verify_consistency(old, &latest, &[]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConsistencyProofInvalid);
        }
        assert!(check_consistency_sizes(&TreeHead::new(3, tree(3).root()), &latest).is_ok());
    }

    #[test]
    fn test_consistency_same_size_different_roots() {
        let a = TreeHead::new(4, tree(4).root());
        let b = TreeHead::new(4, rektor_merkle::hash_leaf(b"fork"));
        let err = verify_consistency(&a, &b, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyProofInvalid);
    }

    #[test]
    fn test_malformed_certificate() {
        let err = extract_public_key(b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CertificateParse);
    }
}
