//! Remote catalog retrieval.
//!
//! The catalog is a JSON array of objects, each naming its source repository
//! in a `repo` field. Everything else in an entry is ignored.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use repomirror_core::RepositoryId;

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    repo: Option<String>,
}

/// Load the catalog from an `http(s)://` URL or a local file path.
pub fn load(location: &str, timeout: Duration) -> Result<Vec<RepositoryId>> {
    let body = if location.starts_with("http://") || location.starts_with("https://") {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        agent
            .get(location)
            .call()
            .with_context(|| format!("failed to fetch catalog {location}"))?
            .into_string()
            .with_context(|| format!("failed to read catalog body from {location}"))?
    } else {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?
    };
    parse(&body).with_context(|| format!("failed to parse catalog {location}"))
}

/// Extract repository ids in catalog order, dropping malformed and repeated
/// entries.
pub fn parse(body: &str) -> Result<Vec<RepositoryId>> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(body)?;
    let mut repos = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Some(raw) = entry.repo else {
            tracing::warn!("catalog entry {index} has no repo field, skipping");
            continue;
        };
        match RepositoryId::parse(&raw) {
            Ok(id) => repos.push(id),
            Err(err) => tracing::warn!("catalog entry {index}: {err}, skipping"),
        }
    }
    Ok(dedup(repos))
}

/// Keep the first occurrence of every id. Two operations on the same
/// checkout must never run in one batch.
pub fn dedup(repos: impl IntoIterator<Item = RepositoryId>) -> Vec<RepositoryId> {
    let mut seen = HashSet::new();
    repos
        .into_iter()
        .filter(|id| {
            let first = seen.insert(id.clone());
            if !first {
                tracing::debug!("dropping duplicate {id}");
            }
            first
        })
        .collect()
}
