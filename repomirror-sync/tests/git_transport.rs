//! `GitCliTransport` against local bare repositories served over `file://`.

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use repomirror_core::RepositoryId;
use repomirror_sync::{GitCliTransport, RepoTransport, SyncError};
use tempfile::TempDir;

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test-user")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "test-user")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// An upstream `<root>/<owner>/<name>.git` with one commit on `branch`, plus
/// a scratch working copy used to push further commits.
struct Upstream {
    root: TempDir,
    work: PathBuf,
    branch: &'static str,
}

impl Upstream {
    fn new(repo: &RepositoryId, branch: &'static str) -> Self {
        let root = TempDir::new().expect("upstream root");
        let bare = root
            .path()
            .join(repo.owner())
            .join(format!("{}.git", repo.name()));
        std::fs::create_dir_all(&bare).expect("mkdir bare");
        run_git(&bare, &["init", "--bare", "--quiet"]);

        let work = root.path().join("work");
        std::fs::create_dir_all(&work).expect("mkdir work");
        run_git(&work, &["init", "--quiet"]);
        let head = format!("refs/heads/{branch}");
        run_git(&work, &["symbolic-ref", "HEAD", head.as_str()]);
        std::fs::write(work.join("manifest.json"), r#"{"version":"1.0.0"}"#).expect("write");
        std::fs::write(work.join("main.js"), "console.log('v1');\n").expect("write");
        run_git(&work, &["add", "."]);
        run_git(&work, &["commit", "--quiet", "-m", "initial"]);
        run_git(
            &work,
            &["remote", "add", "origin", bare.to_str().expect("utf-8 path")],
        );
        run_git(&work, &["push", "--quiet", "origin", branch]);

        Self { root, work, branch }
    }

    fn remote_base(&self) -> String {
        format!("file://{}", self.root.path().display())
    }

    fn push_change(&self) {
        std::fs::write(self.work.join("manifest.json"), r#"{"version":"1.1.0"}"#).expect("write");
        std::fs::write(
            self.work.join("main.js"),
            "console.log('v2');\nconsole.log('more');\n",
        )
        .expect("write");
        run_git(&self.work, &["commit", "--quiet", "-am", "bump"]);
        run_git(&self.work, &["push", "--quiet", "origin", self.branch]);
    }
}

fn repo() -> RepositoryId {
    RepositoryId::parse("owner/plugin").expect("id")
}

#[tokio::test]
async fn clone_of_missing_branch_is_not_found() {
    let upstream = Upstream::new(&repo(), "main");
    let transport = GitCliTransport::new(upstream.remote_base());
    let dest = TempDir::new().expect("dest");
    let target = dest.path().join("owner").join("plugin");

    let err = transport
        .clone_branch(&repo(), "master", &target)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "got: {err}");
}

#[tokio::test]
async fn clone_then_pull_reports_change_summary() {
    let upstream = Upstream::new(&repo(), "main");
    let transport = GitCliTransport::new(upstream.remote_base());
    let dest = TempDir::new().expect("dest");
    let target = dest.path().join("owner").join("plugin");

    transport
        .clone_branch(&repo(), "main", &target)
        .await
        .expect("clone main");
    assert!(target.join("manifest.json").exists());

    let unchanged = transport.pull(&target).await.expect("no-op pull");
    assert!(unchanged.is_empty(), "got: {unchanged:?}");

    upstream.push_change();
    let summary = transport.pull(&target).await.expect("pull");
    assert_eq!(summary.changes, 2);
    assert_eq!(summary.insertions, 3);
    assert_eq!(summary.deletions, 2);
    let manifest = std::fs::read_to_string(target.join("manifest.json")).expect("read");
    assert!(manifest.contains("1.1.0"));
}

#[tokio::test]
async fn pull_outside_a_checkout_is_a_transport_error() {
    let transport = GitCliTransport::new("file:///nonexistent");
    let dir = TempDir::new().expect("dir");
    let err = transport.pull(dir.path()).await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)), "got: {err}");
}

#[tokio::test]
async fn pipeline_clones_skips_then_updates() {
    use repomirror_core::MirrorConfig;
    use repomirror_sync::pipeline;

    let upstream = Upstream::new(&repo(), "main");
    let mirror = TempDir::new().expect("mirror");
    let mut server = mockito::Server::new_async().await;
    let config = MirrorConfig {
        jobs: 2,
        repo_base_path: mirror.path().to_path_buf(),
        remote_base: upstream.remote_base(),
        raw_content_base: server.url(),
        ..MirrorConfig::default()
    };

    let first = pipeline::run(&config, vec![repo()], None).await.expect("run");
    assert_eq!(first.result.new_repos, vec![repo()]);

    let same = server
        .mock("GET", "/owner/plugin/main/manifest.json")
        .with_body(r#"{"version":"1.0.0"}"#)
        .create_async()
        .await;
    let second = pipeline::run(&config, vec![repo()], None).await.expect("run");
    assert!(second.result.is_up_to_date(), "got: {:?}", second.result);
    same.remove_async().await;

    upstream.push_change();
    let _bumped = server
        .mock("GET", "/owner/plugin/main/manifest.json")
        .with_body(r#"{"version":"1.1.0"}"#)
        .create_async()
        .await;
    let third = pipeline::run(&config, vec![repo()], None).await.expect("run");
    assert_eq!(third.result.updated_repos.len(), 1);
    assert_eq!(third.result.updated_repos[0].repo, repo());
    assert_eq!(third.result.updated_repos[0].summary.changes, 2);
}
