//! Rekor transparency log verification
//!
//! Proves that an artifact's signature is valid under its certificate, that
//! the corresponding log entry is included in the log, and that two states
//! of the log are consistent. The verifiers are pure functions over already
//! fetched data; use [`rekor::RekorClient`] to fetch it.
//!
//! ```no_run
//! # async fn run(artifact: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! use rektor::{rekor::RekorClient, verify_entry, EntryMaterial};
//!
//! let entry = RekorClient::public().get_entry_by_index(1234).await?;
//! let verdict = verify_entry(&EntryMaterial::try_from(&entry)?, artifact)?;
//! println!("included in tree of size {}", verdict.tree_head.tree_size);
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod verify;

pub use rektor_crypto as crypto;
pub use rektor_merkle as merkle;
pub use rektor_rekor as rekor;
pub use rektor_types as types;

pub use entry::{verify_entry, EntryMaterial, Verdict};
pub use error::{Error, ErrorKind, Result};
pub use verify::{
    check_consistency_sizes, extract_public_key, verify_checkpoint, verify_consistency,
    verify_inclusion, verify_signature,
};
