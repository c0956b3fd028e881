//! Clone / pull transport.
//!
//! [`GitCliTransport`] drives the `git` binary. Anything that needs to run
//! without a real remote implements [`RepoTransport`] instead.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use repomirror_core::{ChangeSummary, RepositoryId};

use crate::error::SyncError;

#[async_trait]
pub trait RepoTransport: Send + Sync {
    /// Clone `branch` of `repo` into `dest`.
    ///
    /// A branch or repository that does not exist upstream must surface as
    /// [`SyncError::NotFound`].
    async fn clone_branch(
        &self,
        repo: &RepositoryId,
        branch: &str,
        dest: &Path,
    ) -> Result<(), SyncError>;

    /// Fast-forward the checkout at `dest` and report what changed.
    async fn pull(&self, dest: &Path) -> Result<ChangeSummary, SyncError>;
}

// ---------------------------------------------------------------------------
// git CLI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GitCliTransport {
    remote_base: String,
}

impl GitCliTransport {
    pub fn new(remote_base: impl Into<String>) -> Self {
        Self {
            remote_base: remote_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// `<remote_base>/<owner>/<name>.git`
    pub fn clone_url(&self, repo: &RepositoryId) -> String {
        format!("{}/{}.git", self.remote_base, repo)
    }

    async fn git<I, S>(&self, cwd: Option<&Path>, args: I) -> Result<Output, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new("git");
        command
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }
        command
            .output()
            .await
            .map_err(|e| SyncError::Transport(format!("failed to run git: {e}")))
    }

    async fn rev_parse_head(&self, dest: &Path) -> Result<String, SyncError> {
        let output = self.git(Some(dest), ["rev-parse", "HEAD"]).await?;
        if !output.status.success() {
            return Err(command_failure("git rev-parse HEAD", &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl RepoTransport for GitCliTransport {
    async fn clone_branch(
        &self,
        repo: &RepositoryId,
        branch: &str,
        dest: &Path,
    ) -> Result<(), SyncError> {
        let url = self.clone_url(repo);
        tracing::debug!("git clone --branch {branch} {url} {}", dest.display());
        let args: [&OsStr; 6] = [
            "clone".as_ref(),
            "--quiet".as_ref(),
            "--branch".as_ref(),
            branch.as_ref(),
            url.as_ref(),
            dest.as_os_str(),
        ];
        let output = self.git(None, args).await?;
        if !output.status.success() {
            return Err(command_failure("git clone", &output));
        }
        Ok(())
    }

    async fn pull(&self, dest: &Path) -> Result<ChangeSummary, SyncError> {
        let before = self.rev_parse_head(dest).await?;

        let output = self
            .git(Some(dest), ["pull", "--quiet", "--no-rebase", "--ff-only"])
            .await?;
        if !output.status.success() {
            return Err(command_failure("git pull", &output));
        }

        let after = self.rev_parse_head(dest).await?;
        if before == after {
            return Ok(ChangeSummary::default());
        }

        let range = format!("{before}..{after}");
        let output = self
            .git(Some(dest), ["diff", "--shortstat", range.as_str()])
            .await?;
        if !output.status.success() {
            return Err(command_failure("git diff --shortstat", &output));
        }
        Ok(parse_shortstat(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Classify a failed git invocation by its stderr.
fn command_failure(what: &str, output: &Output) -> SyncError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    let message = if message.is_empty() {
        format!("{what} exited with {}", output.status)
    } else {
        format!("{what} failed: {message}")
    };

    if stderr.to_ascii_lowercase().contains("not found") {
        SyncError::NotFound(message)
    } else {
        SyncError::Transport(message)
    }
}

/// Parse `git diff --shortstat` output, e.g.
/// ` 3 files changed, 10 insertions(+), 2 deletions(-)`.
pub fn parse_shortstat(text: &str) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    for part in text.trim().split(',') {
        let mut words = part.split_whitespace();
        let Some(count) = words.next().and_then(|n| n.parse::<u64>().ok()) else {
            continue;
        };
        match words.next() {
            Some(w) if w.starts_with("file") => summary.changes = count,
            Some(w) if w.starts_with("insertion") => summary.insertions = count,
            Some(w) if w.starts_with("deletion") => summary.deletions = count,
            _ => {}
        }
    }
    summary
}
