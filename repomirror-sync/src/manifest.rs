//! Local and remote `manifest.json` access.
//!
//! The remote side sits behind [`ManifestSource`] so the version gate can be
//! exercised without a network.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use repomirror_core::{Manifest, RepositoryId};

use crate::error::{io_err, SyncError};

/// Where remote manifests come from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch and parse the manifest published on `branch`.
    ///
    /// A missing file must surface as [`SyncError::NotFound`]; malformed JSON
    /// as [`SyncError::Json`].
    async fn fetch_manifest(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<Manifest, SyncError>;
}

/// Read and parse a manifest from disk.
pub async fn read_local_manifest(path: &Path) -> Result<Manifest, SyncError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_err(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches `<base>/<owner>/<name>/<branch>/manifest.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpManifestSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("repomirror/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn manifest_url(&self, repo: &RepositoryId, branch: &str) -> String {
        format!("{}/{}/{}/manifest.json", self.base_url, repo, branch)
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_manifest(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<Manifest, SyncError> {
        let url = self.manifest_url(repo, branch);
        let agent = self.agent.clone();
        tracing::debug!("fetching manifest: {url}");

        let body = tokio::task::spawn_blocking(move || fetch_body(&agent, &url))
            .await
            .map_err(|e| SyncError::Transport(format!("manifest fetch task failed: {e}")))??;
        Ok(serde_json::from_str(&body)?)
    }
}

fn fetch_body(agent: &ureq::Agent, url: &str) -> Result<String, SyncError> {
    match agent.get(url).call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| SyncError::Http(format!("failed to read body of {url}: {e}"))),
        Err(ureq::Error::Status(404, _)) => Err(SyncError::NotFound(url.to_string())),
        Err(ureq::Error::Status(code, _)) => {
            Err(SyncError::Http(format!("{url} returned status {code}")))
        }
        Err(ureq::Error::Transport(transport)) => {
            Err(SyncError::Http(format!("{url}: {transport}")))
        }
    }
}
