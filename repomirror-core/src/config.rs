//! Mirror configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.repomirror/
//!   config.yaml    (optional — every key has a default)
//! ```
//!
//! # API pattern
//!
//! - `load_at(home)` — explicit home; used in tests with `TempDir`
//! - `load()` — derives home from `dirs::home_dir()`, delegates to `load_at`
//! - `load_from(path)` — an explicit file that must exist
//!
//! The sync engine never reads configuration itself: callers turn a
//! validated [`MirrorConfig`] into [`SyncOptions`] and pass that down.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_JOBS: usize = 10;
pub const DEFAULT_REMOTE_BASE: &str = "https://github.com";
pub const DEFAULT_RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/obsidianmd/obsidian-releases/master/community-plugins.json";
pub const DEFAULT_REPO_BASE_PATH: &str = "repositories";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Branch names tried in order, first success wins. Used both for the
/// manifest version check and for the clone fallback.
pub fn default_branches() -> Vec<String> {
    vec!["master".to_string(), "main".to_string()]
}

/// Everything a sync run can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Upper bound on simultaneously in-flight repository operations.
    pub jobs: usize,
    /// Pull only when the remote manifest version differs from the local one.
    pub only_new_versions: bool,
    /// Root directory that holds `<owner>/<name>` checkouts.
    pub repo_base_path: PathBuf,
    /// Clone URLs are `<remote_base>/<owner>/<name>.git`.
    pub remote_base: String,
    /// Remote manifests are `<raw_content_base>/<owner>/<name>/<branch>/manifest.json`.
    pub raw_content_base: String,
    /// JSON catalog listing the repositories to mirror.
    pub catalog_url: String,
    pub branches: Vec<String>,
    pub http_timeout_secs: u64,
    /// Keep skipped repositories in the batch result.
    pub record_skipped: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            only_new_versions: true,
            repo_base_path: PathBuf::from(DEFAULT_REPO_BASE_PATH),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            raw_content_base: DEFAULT_RAW_CONTENT_BASE.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            branches: default_branches(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            record_skipped: false,
        }
    }
}

/// The subset of configuration the batch scheduler and version gate consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub jobs: NonZeroUsize,
    pub only_new_versions: bool,
    pub record_skipped: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            jobs: NonZeroUsize::new(DEFAULT_JOBS).unwrap_or(NonZeroUsize::MIN),
            only_new_versions: true,
            record_skipped: false,
        }
    }
}

impl MirrorConfig {
    /// Reject values that cannot drive a sync run.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jobs == 0 {
            return Err(CoreError::InvalidConfig(
                "jobs must be a positive integer".to_string(),
            ));
        }
        if self.branches.is_empty() {
            return Err(CoreError::InvalidConfig(
                "at least one branch name is required".to_string(),
            ));
        }
        if let Some(blank) = self.branches.iter().find(|b| b.trim().is_empty()) {
            return Err(CoreError::InvalidConfig(format!(
                "branch names must be non-empty (got {blank:?})"
            )));
        }
        Ok(())
    }

    /// Validate and derive the engine-facing options.
    pub fn sync_options(&self) -> Result<SyncOptions, CoreError> {
        self.validate()?;
        let jobs = NonZeroUsize::new(self.jobs).ok_or_else(|| {
            CoreError::InvalidConfig("jobs must be a positive integer".to_string())
        })?;
        Ok(SyncOptions {
            jobs,
            only_new_versions: self.only_new_versions,
            record_skipped: self.record_skipped,
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// `<home>/.repomirror/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".repomirror").join("config.yaml")
}

/// Load the config file under `home`, or defaults if it does not exist.
pub fn load_at(home: &Path) -> Result<MirrorConfig, CoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(MirrorConfig::default());
    }
    load_from(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<MirrorConfig, CoreError> {
    let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
    load_at(&home)
}

/// Load an explicit config file. Missing keys fall back to defaults.
pub fn load_from(path: &Path) -> Result<MirrorConfig, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(MirrorConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
