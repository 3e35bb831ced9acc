//! Merkle proof verification
//!
//! Implements inclusion proof and consistency proof verification as specified
//! in RFC 6962, using the index arithmetic of RFC 9162 section 2.1.3.2 and
//! 2.1.4.2. No intermediate tree is materialised; every step is a function of
//! the leaf index and the tree sizes.

use crate::error::{Error, Result};
use crate::tree::{bit_length, hash_children};
use rektor_types::Sha256Hash;

/// Verify an inclusion proof for a leaf in a Merkle tree
///
/// # Arguments
/// * `leaf_hash` - The hash of the leaf entry
/// * `leaf_index` - Index of the leaf in the tree (0-based)
/// * `tree_size` - Total number of leaves in the tree
/// * `proof_hashes` - The audit path, ordered from the leaf towards the root
/// * `expected_root` - The expected root hash to verify against
///
/// # Returns
/// * `Ok(())` if the proof is valid
/// * `Err(Error::RootMismatch)` if the proof evaluates to a different root
/// * any other `Err` if the proof is malformed for this index and size
pub fn verify_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    proof_hashes: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> Result<()> {
    let calculated = root_from_inclusion_proof(leaf_hash, leaf_index, tree_size, proof_hashes)?;

    tracing::debug!(
        calculated = %calculated,
        expected = %expected_root,
        "inclusion proof evaluated"
    );

    if &calculated != expected_root {
        return Err(Error::RootMismatch {
            expected: expected_root.to_hex(),
            actual: calculated.to_hex(),
        });
    }

    Ok(())
}

/// Recompute the root hash implied by an inclusion proof
pub fn root_from_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    proof_hashes: &[Sha256Hash],
) -> Result<Sha256Hash> {
    if tree_size == 0 {
        return Err(Error::InvalidTreeSize(
            "tree size cannot be zero".to_string(),
        ));
    }

    if leaf_index >= tree_size {
        return Err(Error::InvalidLeafIndex(format!(
            "leaf index {} >= tree size {}",
            leaf_index, tree_size
        )));
    }

    let (inner, border) = decompose_inclusion_proof(leaf_index, tree_size);
    if proof_hashes.len() != inner + border {
        return Err(Error::InvalidProof(format!(
            "expected {} proof hashes for leaf {} in tree of size {}, got {}",
            inner + border,
            leaf_index,
            tree_size,
            proof_hashes.len()
        )));
    }

    let mut hash = *leaf_hash;
    let mut index = leaf_index;
    let mut last_node = tree_size - 1;

    for sibling in proof_hashes {
        if index & 1 == 1 || index == last_node {
            // Sibling on the left
            hash = hash_children(sibling, &hash);
            // A rightmost node without a sibling is promoted unchanged, so skip
            // the levels where it is a left child with nothing to its right
            while index & 1 == 0 && index != 0 {
                index >>= 1;
                last_node >>= 1;
            }
        } else {
            hash = hash_children(&hash, sibling);
        }
        index >>= 1;
        last_node >>= 1;
    }

    if last_node != 0 {
        return Err(Error::InvalidProof(format!(
            "proof for leaf {} ends below the root of tree size {}",
            leaf_index, tree_size
        )));
    }

    Ok(hash)
}

/// Verify a consistency proof between two tree states
///
/// # Arguments
/// * `old_size` - Size of the older tree, must be non-zero
/// * `new_size` - Size of the newer tree
/// * `proof_hashes` - The hashes in the consistency proof
/// * `old_root` - Root hash of the older tree
/// * `new_root` - Root hash of the newer tree
///
/// # Returns
/// * `Ok(())` if the proof is valid
/// * `Err(Error::RootMismatch)` if either reconstructed root differs
/// * any other `Err` if the sizes or the proof length are invalid
pub fn verify_consistency_proof(
    old_size: u64,
    new_size: u64,
    proof_hashes: &[Sha256Hash],
    old_root: &Sha256Hash,
    new_root: &Sha256Hash,
) -> Result<()> {
    if old_size == 0 {
        return Err(Error::InvalidTreeSize(
            "old tree size cannot be zero".to_string(),
        ));
    }

    if old_size > new_size {
        return Err(Error::InvalidTreeSize(format!(
            "old size {} > new size {}",
            old_size, new_size
        )));
    }

    if old_size == new_size {
        if !proof_hashes.is_empty() {
            return Err(Error::InvalidProof(
                "proof should be empty for same-size trees".to_string(),
            ));
        }
        if old_root != new_root {
            return Err(Error::InvalidProof(format!(
                "trees of equal size {} have different roots {} and {}",
                old_size,
                old_root.to_hex(),
                new_root.to_hex()
            )));
        }
        return Ok(());
    }

    if proof_hashes.is_empty() {
        return Err(Error::InvalidProof(
            "proof cannot be empty for different-size trees".to_string(),
        ));
    }

    // The old tree splits into a perfect subtree of size 2^shift on its right
    // edge plus the levels above it
    let shift = old_size.trailing_zeros() as usize;
    let (inner, border) = decompose_inclusion_proof(old_size - 1, new_size);
    let inner = inner - shift;

    // The proof starts with the root of that perfect subtree, unless the old
    // tree is itself perfect and its root is the seed
    let (seed, start) = if old_size == 1 << shift {
        (*old_root, 0)
    } else {
        (proof_hashes[0], 1)
    };

    let expected_len = start + inner + border;
    if proof_hashes.len() != expected_len {
        return Err(Error::InvalidProof(format!(
            "expected {} proof hashes for sizes {} -> {}, got {}",
            expected_len,
            old_size,
            new_size,
            proof_hashes.len()
        )));
    }

    let proof = &proof_hashes[start..];
    let mask = (old_size - 1) >> shift;

    let hash1 = chain_inner_right(&seed, &proof[..inner], mask);
    let calc_old_root = chain_border_right(&hash1, &proof[inner..]);

    let hash2 = chain_inner(&seed, &proof[..inner], mask);
    let calc_new_root = chain_border_right(&hash2, &proof[inner..]);

    tracing::debug!(
        old_size,
        new_size,
        calculated_old = %calc_old_root,
        calculated_new = %calc_new_root,
        "consistency proof evaluated"
    );

    if &calc_old_root != old_root {
        return Err(Error::RootMismatch {
            expected: old_root.to_hex(),
            actual: calc_old_root.to_hex(),
        });
    }

    if &calc_new_root != new_root {
        return Err(Error::RootMismatch {
            expected: new_root.to_hex(),
            actual: calc_new_root.to_hex(),
        });
    }

    Ok(())
}

/// Number of proof hashes an inclusion proof for `leaf_index` must carry
pub fn inclusion_proof_len(leaf_index: u64, tree_size: u64) -> usize {
    let (inner, border) = decompose_inclusion_proof(leaf_index, tree_size);
    inner + border
}

/// Decompose an inclusion proof into inner and border path lengths
///
/// Returns (inner_path_length, border_path_length)
fn decompose_inclusion_proof(index: u64, tree_size: u64) -> (usize, usize) {
    let inner = inner_proof_size(index, tree_size);
    // inner reaches 64 once tree_size - 1 has its top bit set
    let border = index.checked_shr(inner as u32).unwrap_or(0).count_ones() as usize;
    (inner, border)
}

/// Calculate the inner proof size for a given index and tree size
fn inner_proof_size(index: u64, tree_size: u64) -> usize {
    bit_length(index ^ (tree_size - 1)) as usize
}

/// Chain hashes along the inner proof path for new root verification
fn chain_inner(seed: &Sha256Hash, proof: &[Sha256Hash], index: u64) -> Sha256Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 0 {
            hash = hash_children(&hash, p);
        } else {
            hash = hash_children(p, &hash);
        }
    }
    hash
}

/// Chain hashes along the inner proof path for old root verification
///
/// Only hashes when the index bit is 1 (we're coming from the left)
fn chain_inner_right(seed: &Sha256Hash, proof: &[Sha256Hash], index: u64) -> Sha256Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            hash = hash_children(p, &hash);
        }
    }
    hash
}

/// Chain hashes along the right border (all proof hashes go on the left)
fn chain_border_right(seed: &Sha256Hash, proof: &[Sha256Hash]) -> Sha256Hash {
    let mut hash = *seed;
    for p in proof {
        hash = hash_children(p, &hash);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::hash_leaf;

    #[test]
    fn test_decompose_inclusion_proof() {
        // tree_size=1, index=0: no proof needed
        assert_eq!(decompose_inclusion_proof(0, 1), (0, 0));
        // tree_size=2, index=0: one inner sibling
        assert_eq!(decompose_inclusion_proof(0, 2), (1, 0));
        // tree_size=2, index=1: 1 ^ 1 = 0 inner, popcount(1) = 1 border
        assert_eq!(decompose_inclusion_proof(1, 2), (0, 1));
        // tree_size=7, index=6: both levels are border hashes
        assert_eq!(decompose_inclusion_proof(6, 7), (0, 2));
        // tree_size=8, index=0: perfect tree, three inner hashes
        assert_eq!(decompose_inclusion_proof(0, 8), (3, 0));
    }

    #[test]
    fn test_decompose_at_u64_limit() {
        assert_eq!(decompose_inclusion_proof(0, u64::MAX), (64, 0));
        assert_eq!(decompose_inclusion_proof(u64::MAX - 1, u64::MAX), (0, 63));
        assert_eq!(inclusion_proof_len(1 << 62, u64::MAX), 64);
    }

    #[test]
    fn test_inclusion_proof_len_for_unbalanced_right_edge() {
        assert_eq!(inclusion_proof_len(2, 3), 1);
        assert_eq!(inclusion_proof_len(4, 5), 1);
        assert_eq!(inclusion_proof_len(6, 7), 2);
        assert_eq!(inclusion_proof_len(5, 7), 3);
    }

    #[test]
    fn test_chain_border_right() {
        let seed = Sha256Hash::from_bytes([0u8; 32]);
        assert_eq!(chain_border_right(&seed, &[]), seed);

        let proof = [Sha256Hash::from_bytes([1u8; 32])];
        assert_eq!(chain_border_right(&seed, &proof), hash_children(&proof[0], &seed));
    }

    #[test]
    fn test_verify_inclusion_proof_single_leaf() {
        let leaf_hash = hash_leaf(b"test");
        assert!(verify_inclusion_proof(&leaf_hash, 0, 1, &[], &leaf_hash).is_ok());
    }

    #[test]
    fn test_verify_inclusion_proof_three_leaves_right_edge() {
        let h0 = hash_leaf(b"leaf0");
        let h1 = hash_leaf(b"leaf1");
        let h2 = hash_leaf(b"leaf2");
        let h01 = hash_children(&h0, &h1);
        let root = hash_children(&h01, &h2);

        // Leaf 2 is promoted past level 0, so its path is just [h01]
        assert!(verify_inclusion_proof(&h2, 2, 3, &[h01], &root).is_ok());
        assert!(verify_inclusion_proof(&h0, 0, 3, &[h1, h2], &root).is_ok());
        assert!(verify_inclusion_proof(&h1, 1, 3, &[h0, h2], &root).is_ok());
    }

    #[test]
    fn test_short_proof_is_malformed_not_mismatch() {
        let h0 = hash_leaf(b"leaf0");
        let h1 = hash_leaf(b"leaf1");
        let root = hash_children(&h0, &h1);

        let err = verify_inclusion_proof(&h0, 0, 2, &[], &root).unwrap_err();
        assert!(err.is_malformed());

        let err = verify_inclusion_proof(&h0, 0, 2, &[h0], &root).unwrap_err();
        assert!(matches!(err, Error::RootMismatch { .. }));
    }

    #[test]
    fn test_consistency_rejects_empty_old_tree() {
        let root = hash_leaf(b"x");
        let err = verify_consistency_proof(0, 1, &[], &root, &root).unwrap_err();
        assert!(matches!(err, Error::InvalidTreeSize(_)));
    }

    #[test]
    fn test_consistency_equal_sizes_different_roots() {
        let a = hash_leaf(b"a");
        let b = hash_leaf(b"b");
        let err = verify_consistency_proof(3, 3, &[], &a, &b).unwrap_err();
        assert!(err.is_malformed());
    }
}
