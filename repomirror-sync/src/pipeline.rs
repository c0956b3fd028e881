//! Shared sync pipeline entrypoint used by the CLI.
//!
//! Wires the git transport and HTTP manifest source from a [`MirrorConfig`]
//! and runs one batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use repomirror_core::{MirrorConfig, RepositoryId, SyncOptions};

use crate::error::SyncError;
use crate::fetcher::RepoFetcher;
use crate::gate::VersionGate;
use crate::manifest::{HttpManifestSource, ManifestSource};
use crate::outcome::BatchResult;
use crate::progress::ProgressCallback;
use crate::scheduler::BatchScheduler;
use crate::transport::{GitCliTransport, RepoTransport};

/// A finished batch plus run metadata, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRun {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    #[serde(flatten)]
    pub result: BatchResult,
}

/// Build a scheduler from explicit collaborators.
pub fn build_scheduler(
    config: &MirrorConfig,
    options: SyncOptions,
    transport: Arc<dyn RepoTransport>,
    manifests: Arc<dyn ManifestSource>,
) -> BatchScheduler {
    let gate = VersionGate::new(
        options.only_new_versions,
        config.branches.clone(),
        config.repo_base_path.clone(),
        manifests,
    );
    let fetcher = RepoFetcher::new(
        config.repo_base_path.clone(),
        config.branches.clone(),
        transport,
        gate,
    );
    BatchScheduler::new(fetcher, options)
}

/// Run one batch against the real git and HTTP collaborators.
///
/// Only configuration errors are returned; repository failures are part of
/// the result.
pub async fn run(
    config: &MirrorConfig,
    repos: Vec<RepositoryId>,
    progress: Option<ProgressCallback>,
) -> Result<SyncRun, SyncError> {
    let options = config.sync_options()?;
    let transport = Arc::new(GitCliTransport::new(config.remote_base.clone()));
    let manifests = Arc::new(HttpManifestSource::new(
        config.raw_content_base.clone(),
        Duration::from_secs(config.http_timeout_secs),
    ));
    let mut scheduler = build_scheduler(config, options, transport, manifests);
    if let Some(progress) = progress {
        scheduler = scheduler.with_progress(progress);
    }
    Ok(run_with(&scheduler, repos).await)
}

/// Run one batch on a prepared scheduler and stamp it with timings.
pub async fn run_with(scheduler: &BatchScheduler, repos: Vec<RepositoryId>) -> SyncRun {
    let started_at = Utc::now();
    let total = repos.len();
    let result = scheduler.process_repositories(repos).await;
    let finished_at = Utc::now();
    tracing::info!(
        "batch finished: {} new, {} updated, {} failed of {total}",
        result.new_repos.len(),
        result.updated_repos.len(),
        result.failed_repos.len()
    );
    SyncRun {
        started_at,
        finished_at,
        total,
        result,
    }
}
