//! Core value objects for transparency-log verification
//!
//! Digests, tree heads, log entries and checkpoints. Everything here is
//! immutable once constructed and validated at construction time.

pub mod checkpoint;
pub mod encoding;
pub mod error;
pub mod log;

pub use checkpoint::{Checkpoint, CheckpointSignature};
pub use encoding::{decode_hex_hashes, Sha256Hash, SHA256_LEN};
pub use error::{Error, Result};
pub use log::{LogEntry, TreeHead};
