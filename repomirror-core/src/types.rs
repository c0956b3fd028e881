//! Domain types shared by the sync engine and the CLI.
//!
//! A [`RepositoryId`] doubles as a remote address and as a relative path
//! under the mirror root, so it is validated once on construction and is
//! immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// RepositoryId
// ---------------------------------------------------------------------------

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId(String);

impl RepositoryId {
    /// Parse and validate an `owner/name` identifier.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidRepositoryId {
            value: value.to_owned(),
            reason,
        };

        let trimmed = value.trim();
        let Some((owner, name)) = trimmed.split_once('/') else {
            return Err(invalid("expected owner/name"));
        };
        if name.contains('/') {
            return Err(invalid("expected exactly one '/'"));
        }
        for segment in [owner, name] {
            if segment.is_empty() {
                return Err(invalid("owner and name must be non-empty"));
            }
            if segment == "." || segment == ".." {
                return Err(invalid("relative path segments are not allowed"));
            }
            if segment
                .chars()
                .any(|c| c == '\\' || c.is_whitespace() || c.is_control())
            {
                return Err(invalid("contains whitespace or path separators"));
            }
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn owner(&self) -> &str {
        self.split().0
    }

    pub fn name(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        // Validated on construction: exactly one '/'.
        self.0.split_once('/').unwrap_or((&self.0, ""))
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RepositoryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RepositoryId> for String {
    fn from(id: RepositoryId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// ChangeSummary
// ---------------------------------------------------------------------------

/// Line counts reported by a pull. Used for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Number of files changed.
    pub changes: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl ChangeSummary {
    /// `true` when the pull brought in nothing at all.
    pub fn is_empty(&self) -> bool {
        self.changes == 0 && self.insertions == 0 && self.deletions == 0
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// A repository's `manifest.json`. Only `version` is load-bearing; all other
/// fields are preserved untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_owner_slash_name() {
        let id = RepositoryId::parse("obsidianmd/obsidian-sample-plugin").unwrap();
        assert_eq!(id.owner(), "obsidianmd");
        assert_eq!(id.name(), "obsidian-sample-plugin");
        assert_eq!(id.to_string(), "obsidianmd/obsidian-sample-plugin");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id = RepositoryId::parse("  owner/repo\n").unwrap();
        assert_eq!(id.as_str(), "owner/repo");
    }

    #[test]
    fn manifest_keeps_unknown_fields() {
        let manifest: Manifest =
            serde_json::from_str(r#"{"id":"sample","version":"1.2.3","minAppVersion":"0.15.0"}"#)
                .unwrap();
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(manifest.extra.get("id"), Some(&serde_json::json!("sample")));
    }

    #[test]
    fn manifest_without_version_is_rejected() {
        let err = serde_json::from_str::<Manifest>(r#"{"id":"sample"}"#).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn change_summary_empty_only_when_all_zero() {
        assert!(ChangeSummary::default().is_empty());
        let one_delete = ChangeSummary {
            deletions: 1,
            ..ChangeSummary::default()
        };
        assert!(!one_delete.is_empty());
    }
}
