//! Repository fetcher — clone-or-pull for a single repository.
//!
//! Every path ends in exactly one [`OperationOutcome`]; errors never leave
//! [`RepoFetcher::fetch`].
//!
//! ## Clone path (no local checkout)
//!
//! Branch candidates are tried in order. `NotFound` moves on to the next
//! candidate; any other error stops. On failure the partial checkout is
//! removed (best effort).
//!
//! ## Pull path (checkout present)
//!
//! The version gate runs first and fails open. A pull that changes nothing
//! is a skip, not an update. A failed pull never touches the checkout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use repomirror_core::{layout, RepositoryId};

use crate::error::SyncError;
use crate::gate::VersionGate;
use crate::outcome::{OperationOutcome, SkipReason};
use crate::probe;
use crate::transport::RepoTransport;

pub struct RepoFetcher {
    repo_base_path: PathBuf,
    branches: Vec<String>,
    transport: Arc<dyn RepoTransport>,
    gate: VersionGate,
}

impl RepoFetcher {
    pub fn new(
        repo_base_path: impl Into<PathBuf>,
        branches: Vec<String>,
        transport: Arc<dyn RepoTransport>,
        gate: VersionGate,
    ) -> Self {
        Self {
            repo_base_path: repo_base_path.into(),
            branches,
            transport,
            gate,
        }
    }

    pub fn local_path(&self, repo: &RepositoryId) -> PathBuf {
        layout::repo_path(&self.repo_base_path, repo)
    }

    /// Clone or pull `repo`, whichever applies.
    pub async fn fetch(&self, repo: RepositoryId) -> OperationOutcome {
        let dest = self.local_path(&repo);
        if probe::exists(&dest).await {
            self.pull_existing(repo, &dest).await
        } else {
            self.clone_new(repo, &dest).await
        }
    }

    async fn clone_new(&self, repo: RepositoryId, dest: &Path) -> OperationOutcome {
        match self.clone_with_fallback(&repo, dest).await {
            Ok(branch) => {
                tracing::info!("{repo}: cloned ({branch})");
                OperationOutcome::New(repo)
            }
            Err(err) => {
                tracing::info!("{repo}: clone failed: {err}");
                remove_partial_checkout(dest).await;
                OperationOutcome::Failed(repo, err.to_string())
            }
        }
    }

    /// Returns the branch that was cloned.
    async fn clone_with_fallback(
        &self,
        repo: &RepositoryId,
        dest: &Path,
    ) -> Result<String, SyncError> {
        let mut last_err = None;
        for branch in &self.branches {
            match self.transport.clone_branch(repo, branch, dest).await {
                Ok(()) => return Ok(branch.clone()),
                Err(err) if err.is_not_found() => {
                    tracing::debug!("{repo}: branch {branch} not found, trying next");
                    remove_partial_checkout(dest).await;
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            SyncError::NotFound(format!("{repo}: no branch candidates configured"))
        }))
    }

    async fn pull_existing(&self, repo: RepositoryId, dest: &Path) -> OperationOutcome {
        match self.gate.should_check_for_updates(&repo).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("{repo}: manifest version unchanged, skipping pull");
                return OperationOutcome::Skipped(repo, SkipReason::VersionUnchanged);
            }
            Err(err) => {
                tracing::warn!("{repo}: {err}; pulling anyway");
            }
        }

        match self.transport.pull(dest).await {
            Ok(summary) if summary.is_empty() => {
                tracing::debug!("{repo}: pull brought no changes");
                OperationOutcome::Skipped(repo, SkipReason::NoChanges)
            }
            Ok(summary) => {
                tracing::info!(
                    "{repo}: updated ({} files, +{} -{})",
                    summary.changes,
                    summary.insertions,
                    summary.deletions
                );
                OperationOutcome::Updated(repo, summary)
            }
            Err(err) => {
                tracing::info!("{repo}: pull failed: {err}");
                OperationOutcome::Failed(repo, err.to_string())
            }
        }
    }
}

/// Recursively remove `dest`. Failures are logged and swallowed.
pub(crate) async fn remove_partial_checkout(dest: &Path) {
    match tokio::fs::remove_dir_all(dest).await {
        Ok(()) => tracing::debug!("removed partial checkout {}", dest.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            let err = SyncError::Cleanup {
                path: dest.to_path_buf(),
                source,
            };
            tracing::warn!("{err}");
        }
    }
}
