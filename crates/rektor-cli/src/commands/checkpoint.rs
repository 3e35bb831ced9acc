//! `rektor checkpoint`: print the latest signed tree head

use anyhow::{Context, Result};
use rektor::rekor::RekorClient;

pub async fn run(client: &RekorClient) -> Result<()> {
    let info = client
        .get_log_info()
        .await
        .context("failed to fetch the latest checkpoint")?;

    let checkpoint = info.checkpoint().map_err(rektor::Error::from)?;
    let output = serde_json::json!({
        "treeID": info.tree_i_d,
        "treeSize": info.tree_size,
        "rootHash": info.root_hash,
        "origin": checkpoint.origin,
        "signatures": checkpoint
            .signatures
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>(),
        "signedTreeHead": info.signed_tree_head,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
