//! repomirror core library — domain types, local layout, configuration, errors.
//!
//! Public API surface:
//! - [`types`] — [`RepositoryId`], [`ChangeSummary`], [`Manifest`]
//! - [`layout`] — where a repository lives on disk
//! - [`config`] — [`MirrorConfig`] (YAML) and the derived [`SyncOptions`]
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod layout;
pub mod types;

pub use config::{MirrorConfig, SyncOptions};
pub use error::CoreError;
pub use types::{ChangeSummary, Manifest, RepositoryId};
