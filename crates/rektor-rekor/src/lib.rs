//! Rekor transparency log client
//!
//! Fetches entries, checkpoints, consistency proofs and the log public key
//! from a Rekor v1 server. Nothing here verifies anything; responses are
//! handed to the `rektor` verifiers.

pub mod body;
pub mod client;
pub mod entry;
pub mod error;

pub use body::HashedRekordBody;
pub use client::{RekorClient, DEFAULT_TIMEOUT, PUBLIC_REKOR_URL};
pub use entry::{ConsistencyProof, InclusionProof, LogEntry, LogInfo, Verification};
pub use error::{Error, Result};
