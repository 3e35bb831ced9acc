//! RFC 6962 Merkle tree verification for transparency logs
//!
//! This crate implements Merkle tree operations as specified in RFC 6962,
//! including inclusion proof and consistency proof verification, plus an
//! in-memory tree that produces those proofs.

pub mod builder;
pub mod error;
pub mod proof;
pub mod tree;

pub use builder::MerkleTree;
pub use error::{Error, Result};
pub use proof::{
    inclusion_proof_len, root_from_inclusion_proof, verify_consistency_proof,
    verify_inclusion_proof,
};
pub use tree::{
    empty_root, hash_children, hash_leaf, try_hash_children, HASH_SIZE, LEAF_HASH_PREFIX,
    NODE_HASH_PREFIX,
};
