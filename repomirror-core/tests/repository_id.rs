//! `RepositoryId` validation and serde behaviour.

use repomirror_core::{CoreError, RepositoryId};
use rstest::rstest;

#[rstest]
#[case("owner/repo")]
#[case("Some-Org/obsidian.plugin_v2")]
#[case("a/b")]
fn accepts_well_formed_ids(#[case] input: &str) {
    let id: RepositoryId = input.parse().unwrap_or_else(|e| panic!("[{input}] {e}"));
    assert_eq!(id.as_str(), input);
}

#[rstest]
#[case("no-slash")]
#[case("/name")]
#[case("owner/")]
#[case("owner/name/extra")]
#[case("../name")]
#[case("owner/..")]
#[case("owner/na me")]
#[case("owner\\name/x")]
#[case("")]
fn rejects_malformed_ids(#[case] input: &str) {
    let err = RepositoryId::parse(input).unwrap_err();
    assert!(
        matches!(err, CoreError::InvalidRepositoryId { .. }),
        "[{input}] got: {err}"
    );
    assert!(err.to_string().contains("invalid repository id"));
}

#[test]
fn serializes_as_plain_string() {
    let id = RepositoryId::parse("owner/repo").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""owner/repo""#);
    let back: RepositoryId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn deserialize_rejects_invalid_id() {
    let err = serde_json::from_str::<RepositoryId>(r#""not-an-id""#).unwrap_err();
    assert!(err.to_string().contains("invalid repository id"));
}
