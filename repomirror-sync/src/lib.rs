//! # repomirror-sync
//!
//! Bounded-concurrency repository synchronization engine.
//!
//! For each `owner/name` in a list, clone it if it is not on disk yet, or
//! pull it if its remote manifest version moved. Call [`pipeline::run`] for a
//! fully wired batch, or assemble a [`BatchScheduler`] from your own
//! [`RepoTransport`] and [`ManifestSource`].

pub mod error;
pub mod fetcher;
pub mod gate;
pub mod manifest;
pub mod outcome;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod scheduler;
pub mod transport;

pub use error::SyncError;
pub use fetcher::RepoFetcher;
pub use gate::VersionGate;
pub use manifest::{HttpManifestSource, ManifestSource};
pub use outcome::{BatchResult, FailedRepo, OperationOutcome, SkipReason, SkippedRepo, UpdatedRepo};
pub use pipeline::SyncRun;
pub use progress::{ProgressCallback, ProgressEvent};
pub use scheduler::BatchScheduler;
pub use transport::{GitCliTransport, RepoTransport};
