//! `repomirror sync` — clone new repositories and pull updated ones.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use repomirror_core::{MirrorConfig, RepositoryId};
use repomirror_sync::{pipeline, ProgressCallback, ProgressEvent};

use crate::{catalog, report, settings::ConfigArgs};

/// Arguments for `repomirror sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Maximum number of repositories processed at once.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Pull every existing checkout, even when its manifest version is unchanged.
    #[arg(long)]
    pub all_changes: bool,

    /// Sync only these repositories instead of the whole catalog.
    #[arg(long = "repo", value_name = "OWNER/NAME")]
    pub repos: Vec<RepositoryId>,

    /// Directory holding the `<owner>/<name>` checkouts.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Base URL that clone URLs are built from.
    #[arg(long, value_name = "URL")]
    pub remote_base: Option<String>,

    /// Base URL for raw remote manifest files.
    #[arg(long, value_name = "URL")]
    pub raw_base: Option<String>,

    /// Catalog URL or local file listing the repositories to mirror.
    #[arg(long, value_name = "URL")]
    pub catalog_url: Option<String>,

    /// List repositories that needed no work in the report.
    #[arg(long)]
    pub show_skipped: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Suppress per-repository progress lines.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.config.load()?;
        self.apply_overrides(&mut config);
        config.validate().context("invalid sync configuration")?;

        let repos = if self.repos.is_empty() {
            let repos = catalog::load(
                &config.catalog_url,
                Duration::from_secs(config.http_timeout_secs),
            )?;
            if !self.quiet {
                eprintln!("Found {} repositories in the catalog.", repos.len());
            }
            repos
        } else {
            catalog::dedup(self.repos.iter().cloned())
        };

        let progress: Option<ProgressCallback> = if self.quiet || self.json {
            None
        } else {
            Some(Arc::new(|event: ProgressEvent<'_>| {
                report::print_progress(&event)
            }))
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let run = runtime
            .block_on(pipeline::run(&config, repos, progress))
            .context("sync failed")?;

        if self.json {
            report::print_json(&run)
        } else {
            report::print_text(&run, config.record_skipped);
            Ok(())
        }
    }

    fn apply_overrides(&self, config: &mut MirrorConfig) {
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if self.all_changes {
            config.only_new_versions = false;
        }
        if let Some(dest) = &self.dest {
            config.repo_base_path = dest.clone();
        }
        if let Some(base) = &self.remote_base {
            config.remote_base = base.clone();
        }
        if let Some(base) = &self.raw_base {
            config.raw_content_base = base.clone();
        }
        if let Some(url) = &self.catalog_url {
            config.catalog_url = url.clone();
        }
        if self.show_skipped {
            config.record_skipped = true;
        }
    }
}
