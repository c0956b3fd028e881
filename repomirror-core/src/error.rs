//! Error types for repomirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from parsing identifiers and loading configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A repository identifier that is not of the form `owner/name`.
    #[error("invalid repository id '{value}': {reason}")]
    InvalidRepositoryId { value: String, reason: &'static str },

    /// Configuration values that cannot drive a sync run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying I/O failure while reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and serde_yaml context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
