//! Per-repository outcomes and the batch aggregate.

use serde::Serialize;

use repomirror_core::{ChangeSummary, RepositoryId};

/// Why a repository produced no reportable change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Local and remote manifest versions match.
    VersionUnchanged,
    /// The pull ran but brought in nothing.
    NoChanges,
}

/// Terminal result of one repository's operation. Produced once per
/// repository per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    New(RepositoryId),
    Updated(RepositoryId, ChangeSummary),
    /// `error` is the human-readable message, not a debug dump.
    Failed(RepositoryId, String),
    Skipped(RepositoryId, SkipReason),
}

impl OperationOutcome {
    pub fn repo(&self) -> &RepositoryId {
        match self {
            OperationOutcome::New(repo)
            | OperationOutcome::Updated(repo, _)
            | OperationOutcome::Failed(repo, _)
            | OperationOutcome::Skipped(repo, _) => repo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedRepo {
    pub repo: RepositoryId,
    pub summary: ChangeSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRepo {
    pub repo: RepositoryId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRepo {
    pub repo: RepositoryId,
    pub reason: SkipReason,
}

/// Everything a batch produced, partitioned by outcome, in completion order.
///
/// Purely additive: no removal, no de-duplication. Skipped repositories are
/// only kept when the aggregate was created with [`BatchResult::recording_skipped`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub new_repos: Vec<RepositoryId>,
    pub updated_repos: Vec<UpdatedRepo>,
    pub failed_repos: Vec<FailedRepo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_repos: Vec<SkippedRepo>,
    #[serde(skip)]
    record_skipped: bool,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording_skipped() -> Self {
        Self {
            record_skipped: true,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: OperationOutcome) {
        match outcome {
            OperationOutcome::New(repo) => self.new_repos.push(repo),
            OperationOutcome::Updated(repo, summary) => {
                self.updated_repos.push(UpdatedRepo { repo, summary })
            }
            OperationOutcome::Failed(repo, error) => {
                self.failed_repos.push(FailedRepo { repo, error })
            }
            OperationOutcome::Skipped(repo, reason) => {
                if self.record_skipped {
                    self.skipped_repos.push(SkippedRepo { repo, reason });
                }
            }
        }
    }

    /// Nothing new, updated or failed.
    pub fn is_up_to_date(&self) -> bool {
        self.new_repos.is_empty() && self.updated_repos.is_empty() && self.failed_repos.is_empty()
    }

    /// Number of outcomes in the three reported buckets.
    pub fn reported_len(&self) -> usize {
        self.new_repos.len() + self.updated_repos.len() + self.failed_repos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RepositoryId {
        RepositoryId::parse(s).unwrap()
    }

    #[test]
    fn record_partitions_by_tag() {
        let mut result = BatchResult::new();
        result.record(OperationOutcome::New(id("a/one")));
        result.record(OperationOutcome::Updated(
            id("a/two"),
            ChangeSummary {
                changes: 1,
                insertions: 2,
                deletions: 0,
            },
        ));
        result.record(OperationOutcome::Failed(id("a/three"), "boom".into()));
        result.record(OperationOutcome::Skipped(id("a/four"), SkipReason::NoChanges));

        assert_eq!(result.new_repos, vec![id("a/one")]);
        assert_eq!(result.updated_repos[0].repo, id("a/two"));
        assert_eq!(result.failed_repos[0].error, "boom");
        assert!(result.skipped_repos.is_empty(), "skips are hidden by default");
        assert_eq!(result.reported_len(), 3);
        assert!(!result.is_up_to_date());
    }

    #[test]
    fn skipped_are_kept_when_requested() {
        let mut result = BatchResult::recording_skipped();
        result.record(OperationOutcome::Skipped(
            id("a/four"),
            SkipReason::VersionUnchanged,
        ));
        assert_eq!(result.skipped_repos.len(), 1);
        assert!(result.is_up_to_date());
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let mut result = BatchResult::new();
        result.record(OperationOutcome::New(id("a/one")));
        result.record(OperationOutcome::New(id("a/one")));
        assert_eq!(result.new_repos.len(), 2);
    }

    #[test]
    fn serializes_reported_buckets() {
        let mut result = BatchResult::new();
        result.record(OperationOutcome::Failed(id("a/x"), "nope".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["failed_repos"][0]["repo"], "a/x");
        assert_eq!(json["failed_repos"][0]["error"], "nope");
        assert!(json.get("skipped_repos").is_none());
    }
}
