//! Per-repository progress notifications.
//!
//! Completions arrive in no particular order; observers must not assume the
//! input order or wave boundaries.

use std::sync::Arc;

use repomirror_core::RepositoryId;

use crate::outcome::OperationOutcome;

#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    Started {
        total: usize,
    },
    /// One repository reached a terminal state.
    Completed {
        repo: &'a RepositoryId,
        outcome: &'a OperationOutcome,
        completed: usize,
        total: usize,
    },
    Finished {
        completed: usize,
    },
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent<'_>) + Send + Sync>;

pub(crate) fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent<'_>) {
    if let Some(callback) = callback {
        callback(event);
    }
}
