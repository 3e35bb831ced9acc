//! Log entry and tree head value objects

use crate::encoding::Sha256Hash;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The `(tree size, root hash)` pair a log commits to at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeHead {
    /// Number of leaves in the tree
    pub tree_size: u64,
    /// Merkle root over those leaves
    pub root_hash: Sha256Hash,
}

impl TreeHead {
    pub fn new(tree_size: u64, root_hash: Sha256Hash) -> Self {
        Self {
            tree_size,
            root_hash,
        }
    }

    /// Whether `self` may be checked for consistency against `newer`
    pub fn precedes(&self, newer: &TreeHead) -> bool {
        self.tree_size <= newer.tree_size
    }
}

/// A log entry together with the audit path proving its inclusion
///
/// The leaf index is always strictly smaller than the tree size of the
/// tree head the entry was proven against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    log_index: u64,
    leaf_hash: Sha256Hash,
    audit_path: Vec<Sha256Hash>,
    tree_head: TreeHead,
}

impl LogEntry {
    /// Create an entry from an already computed leaf hash
    pub fn new(
        log_index: u64,
        leaf_hash: Sha256Hash,
        audit_path: Vec<Sha256Hash>,
        tree_head: TreeHead,
    ) -> Result<Self> {
        if log_index >= tree_head.tree_size {
            return Err(Error::InvalidEntry(format!(
                "log index {} is not below tree size {}",
                log_index, tree_head.tree_size
            )));
        }
        Ok(Self {
            log_index,
            leaf_hash,
            audit_path,
            tree_head,
        })
    }

    /// Position of the leaf in the log
    pub fn log_index(&self) -> u64 {
        self.log_index
    }

    pub fn leaf_hash(&self) -> &Sha256Hash {
        &self.leaf_hash
    }

    /// Sibling hashes from the leaf up to the root
    pub fn audit_path(&self) -> &[Sha256Hash] {
        &self.audit_path
    }

    pub fn tree_head(&self) -> &TreeHead {
        &self.tree_head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(size: u64) -> TreeHead {
        TreeHead::new(size, Sha256Hash::from_bytes([7u8; 32]))
    }

    #[test]
    fn test_entry_index_must_be_below_tree_size() {
        let leaf = Sha256Hash::from_bytes([1u8; 32]);
        assert!(LogEntry::new(0, leaf, vec![], head(1)).is_ok());
        assert!(LogEntry::new(1, leaf, vec![], head(1)).is_err());
        assert!(LogEntry::new(0, leaf, vec![], head(0)).is_err());
    }

    #[test]
    fn test_tree_head_ordering() {
        assert!(head(3).precedes(&head(3)));
        assert!(head(3).precedes(&head(7)));
        assert!(!head(8).precedes(&head(7)));
    }
}
