//! Local mirror layout.
//!
//! ```text
//! <repo_base_path>/
//!   <owner>/
//!     <name>/               (working checkout, created by clone)
//!       manifest.json       (read-only from the engine's perspective)
//! ```

use std::path::{Path, PathBuf};

use crate::types::RepositoryId;

/// File name of the per-repository version marker.
pub const MANIFEST_FILE: &str = "manifest.json";

/// `<base>/<owner>/<name>` — pure, no I/O.
pub fn repo_path(base: &Path, repo: &RepositoryId) -> PathBuf {
    base.join(repo.owner()).join(repo.name())
}

/// `<base>/<owner>/<name>/manifest.json` — pure, no I/O.
pub fn local_manifest_path(base: &Path, repo: &RepositoryId) -> PathBuf {
    repo_path(base, repo).join(MANIFEST_FILE)
}
