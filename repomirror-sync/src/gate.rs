//! Version gate — decides whether an existing checkout needs a pull at all.
//!
//! Decision order:
//! 1. Gating disabled → always check.
//! 2. No local `manifest.json` → always check (first run for this checkout).
//! 3. For each candidate branch, in order: fetch the remote manifest and
//!    compare versions. The first branch that answers decides.
//! 4. Every branch failed → [`SyncError::ManifestUnavailable`]; callers fail
//!    open and pull anyway.

use std::path::PathBuf;
use std::sync::Arc;

use repomirror_core::{layout, RepositoryId};

use crate::error::SyncError;
use crate::manifest::{read_local_manifest, ManifestSource};
use crate::probe;

pub struct VersionGate {
    enabled: bool,
    branches: Vec<String>,
    repo_base_path: PathBuf,
    source: Arc<dyn ManifestSource>,
}

impl VersionGate {
    pub fn new(
        enabled: bool,
        branches: Vec<String>,
        repo_base_path: impl Into<PathBuf>,
        source: Arc<dyn ManifestSource>,
    ) -> Self {
        Self {
            enabled,
            branches,
            repo_base_path: repo_base_path.into(),
            source,
        }
    }

    /// `true` when `repo` should be pulled.
    pub async fn should_check_for_updates(&self, repo: &RepositoryId) -> Result<bool, SyncError> {
        if !self.enabled {
            return Ok(true);
        }

        let local_path = layout::local_manifest_path(&self.repo_base_path, repo);
        if !probe::exists(&local_path).await {
            tracing::debug!("{repo}: no local manifest, checking for updates");
            return Ok(true);
        }

        let local = match read_local_manifest(&local_path).await {
            Ok(local) => Some(local),
            Err(err) => {
                tracing::debug!("{repo}: unreadable local manifest: {err}");
                None
            }
        };

        if let Some(local) = local {
            for branch in &self.branches {
                match self.source.fetch_manifest(repo, branch).await {
                    Ok(remote) => {
                        let changed = local.version != remote.version;
                        tracing::debug!(
                            "{repo}: local {} vs {branch} {} → {}",
                            local.version,
                            remote.version,
                            if changed { "update" } else { "unchanged" }
                        );
                        return Ok(changed);
                    }
                    Err(err) => {
                        tracing::debug!("{repo}: manifest on {branch} unavailable: {err}");
                    }
                }
            }
        }

        Err(SyncError::ManifestUnavailable {
            repo: repo.clone(),
            branches: self.branches.join(", "),
        })
    }
}
