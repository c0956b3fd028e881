//! Existence probe.

use std::path::Path;

/// Whether `path` is already materialized on disk.
///
/// Any access error counts as absent: a path that cannot be confirmed is
/// re-cloned rather than aborting the run.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
