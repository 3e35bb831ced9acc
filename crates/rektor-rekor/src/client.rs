//! Rekor client for transparency log operations

use crate::entry::{ConsistencyProof, LogEntry, LogEntryResponse, LogInfo};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL of the public Sigstore Rekor instance
pub const PUBLIC_REKOR_URL: &str = "https://rekor.sigstore.dev";

/// Per-request timeout used unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A client for the Rekor v1 REST API
#[derive(Debug, Clone)]
pub struct RekorClient {
    /// Base URL of the Rekor instance, without the `/api/v1` suffix
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RekorClient {
    /// Create a new Rekor client
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client for the public Sigstore Rekor instance
    pub fn public() -> Self {
        Self::new(PUBLIC_REKOR_URL)
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get log info (tree size, root hash, signed tree head)
    pub async fn get_log_info(&self) -> Result<LogInfo> {
        self.get_json("/api/v1/log", "log info").await
    }

    /// Get a log entry by index
    pub async fn get_entry_by_index(&self, index: u64) -> Result<LogEntry> {
        let path = format!("/api/v1/log/entries?logIndex={}", index);
        let entries: LogEntryResponse = self
            .get_json(&path, &format!("entry at index {}", index))
            .await?;

        let (uuid, mut entry) = entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::Api(format!("no entry at index {}", index)))?;

        entry.uuid = uuid;
        Ok(entry)
    }

    /// Get a consistency proof between two tree sizes
    ///
    /// `tree_id` selects a specific shard; the active shard is used when absent.
    pub async fn get_consistency_proof(
        &self,
        first_size: u64,
        last_size: u64,
        tree_id: Option<&str>,
    ) -> Result<ConsistencyProof> {
        let mut path = format!(
            "/api/v1/log/proof?firstSize={}&lastSize={}",
            first_size, last_size
        );
        if let Some(tree_id) = tree_id {
            path.push_str(&format!("&treeID={}", tree_id));
        }
        self.get_json(&path, "consistency proof").await
    }

    /// Get the PEM-encoded public key the log signs checkpoints with
    pub async fn get_public_key(&self) -> Result<String> {
        let response = self.get("/api/v1/log/publicKey", "public key").await?;
        response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))
    }

    async fn get(&self, path: &str, what: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.url, path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "failed to get {}: {}",
                what,
                response.status()
            )));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        self.get(path, what)
            .await?
            .json()
            .await
            .map_err(|e| Error::Http(format!("failed to parse JSON: {}", e)))
    }
}

impl Default for RekorClient {
    fn default() -> Self {
        Self::public()
    }
}
