//! Error types for repomirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use repomirror_core::{CoreError, RepositoryId};

/// All errors that can arise while synchronizing a single repository.
///
/// None of these escape a batch: the scheduler turns them into
/// per-repository outcomes.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Branch or repository absent upstream. Recovered by trying the next
    /// candidate branch.
    #[error("not found: {0}")]
    NotFound(String),

    /// No candidate branch yielded a readable remote manifest.
    #[error("no readable manifest for {repo} on any of: {branches}")]
    ManifestUnavailable { repo: RepositoryId, branches: String },

    /// Generic network / git failure during clone or pull.
    #[error("{0}")]
    Transport(String),

    /// Removal of a partial clone failed. Logged, never surfaced.
    #[error("failed to clean up {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed manifest JSON.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP status or connection failure from the manifest endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
