//! `rektor consistency`: verify the log only grew since a known tree head

use anyhow::{Context, Result};
use rektor::crypto::PublicKey;
use rektor::rekor::RekorClient;
use rektor::types::{Sha256Hash, TreeHead};
use rektor::{check_consistency_sizes, verify_checkpoint, verify_consistency};

pub async fn run(client: &RekorClient, tree_id: &str, tree_size: u64, root_hash: &str) -> Result<()> {
    let old = TreeHead::new(
        tree_size,
        Sha256Hash::from_hex(root_hash).context("--root-hash must be 64 hex characters")?,
    );

    let info = client
        .get_log_info()
        .await
        .context("failed to fetch the latest checkpoint")?;
    let key_pem = client
        .get_public_key()
        .await
        .context("failed to fetch the log public key")?;

    let log_key = PublicKey::from_pem(&key_pem).map_err(rektor::Error::from)?;
    let checkpoint = info.checkpoint().map_err(rektor::Error::from)?;
    verify_checkpoint(&checkpoint, &log_key)?;

    // Only the signed head is trusted; the unsigned fields must agree with it
    let new = checkpoint.tree_head();
    if info.tree_head().map_err(rektor::Error::from)? != new {
        return Err(rektor::Error::Checkpoint(
            "log info disagrees with its signed tree head".to_string(),
        )
        .into());
    }

    check_consistency_sizes(&old, &new)?;
    let proof = if old.tree_size == new.tree_size {
        Vec::new()
    } else {
        client
            .get_consistency_proof(old.tree_size, new.tree_size, Some(tree_id))
            .await
            .context("failed to fetch consistency proof")?
            .hashes()
            .map_err(rektor::Error::from)?
    };

    verify_consistency(&old, &new, &proof)?;
    println!(
        "Tree of size {} is consistent with tree of size {} (root {})",
        old.tree_size,
        new.tree_size,
        new.root_hash.to_hex()
    );
    Ok(())
}
