//! Batch scheduler — drains a repository list in waves of at most `jobs`
//! concurrent fetches.
//!
//! Each wave is a `JoinSet`; the next wave starts only after the current one
//! is fully joined. Completions are recorded (and reported) in the order they
//! finish. A panicking fetch is converted into a `Failed` outcome for its
//! repository, so every dispatched repository yields exactly one outcome.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;

use repomirror_core::{RepositoryId, SyncOptions};

use crate::fetcher::{remove_partial_checkout, RepoFetcher};
use crate::outcome::{BatchResult, OperationOutcome};
use crate::probe;
use crate::progress::{emit, ProgressCallback, ProgressEvent};

pub struct BatchScheduler {
    fetcher: Arc<RepoFetcher>,
    options: SyncOptions,
    progress: Option<ProgressCallback>,
}

impl BatchScheduler {
    pub fn new(fetcher: RepoFetcher, options: SyncOptions) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            options,
            progress: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Clone or update every repository in `repos`.
    ///
    /// Never fails: per-repository errors land in `failed_repos`.
    /// Extraction order is last-in-first-out.
    pub async fn process_repositories(&self, mut repos: Vec<RepositoryId>) -> BatchResult {
        let total = repos.len();
        let jobs = self.options.jobs.get();
        let mut result = if self.options.record_skipped {
            BatchResult::recording_skipped()
        } else {
            BatchResult::new()
        };
        let mut completed = 0;

        emit(self.progress.as_ref(), ProgressEvent::Started { total });
        tracing::debug!("processing {total} repositories, {jobs} at a time");

        while !repos.is_empty() {
            let wave = repos.split_off(repos.len().saturating_sub(jobs));
            tracing::debug!("dispatching wave of {}", wave.len());

            let mut set = JoinSet::new();
            for repo in wave {
                let fetcher = Arc::clone(&self.fetcher);
                set.spawn(fetch_isolated(fetcher, repo));
            }

            while let Some(joined) = set.join_next().await {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        // Panics are caught inside the task; only cancellation
                        // reaches here, and nothing cancels a wave.
                        tracing::error!("repository task did not complete: {err}");
                        continue;
                    }
                };
                completed += 1;
                emit(
                    self.progress.as_ref(),
                    ProgressEvent::Completed {
                        repo: outcome.repo(),
                        outcome: &outcome,
                        completed,
                        total,
                    },
                );
                result.record(outcome);
            }
        }

        emit(self.progress.as_ref(), ProgressEvent::Finished { completed });
        result
    }
}

async fn fetch_isolated(fetcher: Arc<RepoFetcher>, repo: RepositoryId) -> OperationOutcome {
    let dest = fetcher.local_path(&repo);
    let cloning = !probe::exists(&dest).await;
    match AssertUnwindSafe(fetcher.fetch(repo.clone()))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("{repo}: fetch panicked: {message}");
            // An existing checkout is never removed, only one this fetch created.
            if cloning {
                remove_partial_checkout(&dest).await;
            }
            OperationOutcome::Failed(repo, format!("internal error: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");
        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
