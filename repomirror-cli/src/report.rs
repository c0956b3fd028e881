//! Rendering of progress lines and the final run report.

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use repomirror_sync::{pipeline::SyncRun, OperationOutcome, ProgressEvent, SkipReason};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

pub fn print_progress(event: &ProgressEvent<'_>) {
    match event {
        ProgressEvent::Started { total } => {
            eprintln!("{}", format!("Syncing {total} repositories").bold());
        }
        ProgressEvent::Completed {
            repo,
            outcome,
            completed,
            total,
        } => {
            let width = total.to_string().len();
            eprintln!(
                "[{completed:>width$}/{total}] {} {repo}",
                outcome_indicator(outcome)
            );
        }
        ProgressEvent::Finished { .. } => {}
    }
}

fn outcome_indicator(outcome: &OperationOutcome) -> String {
    match outcome {
        OperationOutcome::New(_) => "★".yellow().bold().to_string(),
        OperationOutcome::Updated(..) => "✓".green().bold().to_string(),
        OperationOutcome::Failed(..) => "✗".red().bold().to_string(),
        OperationOutcome::Skipped(..) => "·".bright_black().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Final report
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct UpdatedRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "files changed")]
    changes: u64,
    #[tabled(rename = "insertions")]
    insertions: u64,
    #[tabled(rename = "deletions")]
    deletions: u64,
}

pub fn print_json(run: &SyncRun) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(run).context("failed to serialize sync report")?
    );
    Ok(())
}

pub fn print_text(run: &SyncRun, show_skipped: bool) {
    print!("{}", render_text(run, show_skipped));
}

fn render_text(run: &SyncRun, show_skipped: bool) -> String {
    let result = &run.result;
    let mut out = String::new();

    if result.is_up_to_date() {
        out.push_str("Everything is up to date.\n");
    }

    if !result.new_repos.is_empty() {
        let heading = format!("{} new", result.new_repos.len());
        out.push_str(&format!("{}\n", heading.yellow().bold()));
        for repo in &result.new_repos {
            out.push_str(&format!("  {repo}\n"));
        }
    }

    if !result.updated_repos.is_empty() {
        let heading = format!("{} updated", result.updated_repos.len());
        out.push_str(&format!("{}\n", heading.green().bold()));
        let rows: Vec<UpdatedRow> = result
            .updated_repos
            .iter()
            .map(|updated| UpdatedRow {
                repo: updated.repo.to_string(),
                changes: updated.summary.changes,
                insertions: updated.summary.insertions,
                deletions: updated.summary.deletions,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&format!("{table}\n"));
    }

    if !result.failed_repos.is_empty() {
        let heading = format!("{} failed", result.failed_repos.len());
        out.push_str(&format!("{}\n", heading.red().bold()));
        for failed in &result.failed_repos {
            out.push_str(&format!("  {}: {}\n", failed.repo, failed.error));
        }
    }

    if show_skipped && !result.skipped_repos.is_empty() {
        let heading = format!("{} skipped", result.skipped_repos.len());
        out.push_str(&format!("{}\n", heading.bright_black().bold()));
        for skipped in &result.skipped_repos {
            out.push_str(&format!("  {}: {}\n", skipped.repo, skip_label(skipped.reason)));
        }
    }

    out
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::VersionUnchanged => "version unchanged",
        SkipReason::NoChanges => "no changes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use repomirror_core::{ChangeSummary, RepositoryId};
    use repomirror_sync::BatchResult;

    fn id(value: &str) -> RepositoryId {
        RepositoryId::parse(value).unwrap()
    }

    fn run_of(result: BatchResult) -> SyncRun {
        let now = Utc::now();
        SyncRun {
            started_at: now,
            finished_at: now,
            total: 0,
            result,
        }
    }

    #[test]
    fn empty_batch_is_up_to_date() {
        colored::control::set_override(false);
        let text = render_text(&run_of(BatchResult::new()), false);
        assert_eq!(text, "Everything is up to date.\n");
    }

    #[test]
    fn sections_list_each_bucket() {
        colored::control::set_override(false);
        let mut result = BatchResult::recording_skipped();
        result.record(OperationOutcome::New(id("a/new")));
        result.record(OperationOutcome::Updated(
            id("b/updated"),
            ChangeSummary {
                changes: 4,
                insertions: 10,
                deletions: 2,
            },
        ));
        result.record(OperationOutcome::Failed(id("c/broken"), "remote hung up".into()));
        result.record(OperationOutcome::Skipped(id("d/same"), SkipReason::VersionUnchanged));

        let text = render_text(&run_of(result.clone()), true);
        assert!(!text.contains("Everything is up to date."));
        assert!(text.contains("1 new\n  a/new\n"));
        assert!(text.contains("1 updated"));
        assert!(text.contains("b/updated"));
        assert!(text.contains("files changed"));
        assert!(text.contains("1 failed\n  c/broken: remote hung up\n"));
        assert!(text.contains("1 skipped\n  d/same: version unchanged\n"));

        let hidden = render_text(&run_of(result), false);
        assert!(!hidden.contains("skipped"));
    }
}
