//! `rektor inclusion`: verify an artifact's entry is in the log

use std::path::Path;

use anyhow::{Context, Result};
use rektor::rekor::RekorClient;
use rektor::{verify_entry, EntryMaterial};

pub async fn run(client: &RekorClient, log_index: u64, artifact_path: &Path) -> Result<()> {
    // Read before touching the network so a bad path fails fast
    let artifact = std::fs::read(artifact_path)
        .with_context(|| format!("cannot read artifact {}", artifact_path.display()))?;

    let entry = client
        .get_entry_by_index(log_index)
        .await
        .with_context(|| format!("failed to fetch entry {}", log_index))?;
    tracing::debug!(uuid = %entry.uuid, "fetched entry");

    let material = EntryMaterial::try_from(&entry)?;
    let verdict = verify_entry(&material, &artifact)?;

    println!("Signature is valid ({})", verdict.scheme);
    if let Some(identity) = &verdict.identity {
        println!("Signed by: {}", identity);
    }
    println!(
        "Entry {} is included in tree of size {} (root {})",
        verdict.log_index,
        verdict.tree_head.tree_size,
        verdict.tree_head.root_hash.to_hex()
    );
    println!("Leaf hash: {}", verdict.leaf_hash.to_hex());
    Ok(())
}
