//! In-memory Merkle tree for producing proofs
//!
//! Follows the recursive definitions of RFC 6962 section 2.1 (`MTH`, `PATH`
//! and `PROOF`) over a flat list of leaf hashes. Useful for local logs and
//! for exercising the verifiers in [`crate::proof`].

use crate::error::{Error, Result};
use crate::tree::{bit_length, empty_root, hash_children, hash_leaf};
use rektor_types::Sha256Hash;

/// An append-only Merkle tree held in memory
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    leaves: Vec<Sha256Hash>,
}

impl MerkleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from raw leaf contents
    pub fn from_leaves<I, T>(leaves: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self {
            leaves: leaves.into_iter().map(|l| hash_leaf(l.as_ref())).collect(),
        }
    }

    /// Append a leaf, returning its index
    pub fn push(&mut self, data: &[u8]) -> u64 {
        self.push_hash(hash_leaf(data))
    }

    /// Append an already hashed leaf, returning its index
    pub fn push_hash(&mut self, leaf_hash: Sha256Hash) -> u64 {
        self.leaves.push(leaf_hash);
        (self.leaves.len() - 1) as u64
    }

    pub fn len(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaf_hash(&self, index: u64) -> Option<&Sha256Hash> {
        self.leaves.get(usize::try_from(index).ok()?)
    }

    /// Root hash over all leaves
    pub fn root(&self) -> Sha256Hash {
        subtree_root(&self.leaves)
    }

    /// Root hash over the first `size` leaves
    pub fn root_at(&self, size: u64) -> Result<Sha256Hash> {
        Ok(subtree_root(self.prefix(size)?))
    }

    /// Audit path for `index` in the tree made of the first `size` leaves
    pub fn inclusion_proof(&self, index: u64, size: u64) -> Result<Vec<Sha256Hash>> {
        let leaves = self.prefix(size)?;
        if index >= size {
            return Err(Error::InvalidLeafIndex(format!(
                "leaf index {} >= tree size {}",
                index, size
            )));
        }
        let mut path = Vec::new();
        audit_path(index as usize, leaves, &mut path);
        Ok(path)
    }

    /// Consistency proof from the first `old_size` leaves to the first `new_size`
    pub fn consistency_proof(&self, old_size: u64, new_size: u64) -> Result<Vec<Sha256Hash>> {
        let leaves = self.prefix(new_size)?;
        if old_size > new_size {
            return Err(Error::InvalidTreeSize(format!(
                "old size {} > new size {}",
                old_size, new_size
            )));
        }
        let mut proof = Vec::new();
        if old_size > 0 && old_size < new_size {
            subproof(old_size as usize, leaves, true, &mut proof);
        }
        Ok(proof)
    }

    fn prefix(&self, size: u64) -> Result<&[Sha256Hash]> {
        usize::try_from(size)
            .ok()
            .and_then(|size| self.leaves.get(..size))
            .ok_or_else(|| {
                Error::InvalidTreeSize(format!(
                    "requested size {} exceeds tree of {} leaves",
                    size,
                    self.leaves.len()
                ))
            })
    }
}

/// Largest power of two strictly smaller than `n` (n > 1)
fn split_point(n: usize) -> usize {
    1 << (bit_length(n as u64 - 1) - 1)
}

fn subtree_root(leaves: &[Sha256Hash]) -> Sha256Hash {
    match leaves.len() {
        0 => empty_root(),
        1 => leaves[0],
        n => {
            let k = split_point(n);
            hash_children(&subtree_root(&leaves[..k]), &subtree_root(&leaves[k..]))
        }
    }
}

fn audit_path(index: usize, leaves: &[Sha256Hash], path: &mut Vec<Sha256Hash>) {
    let n = leaves.len();
    if n <= 1 {
        return;
    }
    let k = split_point(n);
    if index < k {
        audit_path(index, &leaves[..k], path);
        path.push(subtree_root(&leaves[k..]));
    } else {
        audit_path(index - k, &leaves[k..], path);
        path.push(subtree_root(&leaves[..k]));
    }
}

fn subproof(m: usize, leaves: &[Sha256Hash], complete: bool, proof: &mut Vec<Sha256Hash>) {
    let n = leaves.len();
    if m == n {
        if !complete {
            proof.push(subtree_root(leaves));
        }
        return;
    }
    let k = split_point(n);
    if m <= k {
        subproof(m, &leaves[..k], complete, proof);
        proof.push(subtree_root(&leaves[k..]));
    } else {
        subproof(m - k, &leaves[k..], false, proof);
        proof.push(subtree_root(&leaves[..k]));
    }
}
