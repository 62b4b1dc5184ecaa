//! Chains built from `modchain.json` over directory repositories.

use modchain_core::chain::{ComponentIdentifier, ComponentOverride, Outcome, ResolveError};
use modchain_core::repo::descriptor_path;
use modchain_core::ChainConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn put(root: &Path, coords: &str, content: &str) {
    let id = coords.parse().unwrap();
    let path = descriptor_path(root, &id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Two repositories: a local-only `vendored` one and a `central` one with a
/// mirror.
fn setup(reject: &[&str]) -> (TempDir, ChainConfig) {
    let dir = TempDir::new().unwrap();
    let config = serde_json::json!({
        "repositories": [
            { "name": "vendored", "cache": "vendored" },
            { "name": "central", "cache": "cache/central", "remote": "mirror/central" }
        ],
        "reject": reject,
    });
    let path = dir.path().join("modchain.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    let config = ChainConfig::load(&path).unwrap();
    (dir, config)
}

fn id(s: &str) -> ComponentIdentifier {
    s.parse().unwrap()
}

#[test]
fn test_remote_hit_then_served_from_cache() {
    let (dir, config) = setup(&[]);
    put(
        &dir.path().join("mirror/central"),
        "org.example:lib:1.0",
        r#"{"dependencies":["org.dep:core:2.0"]}"#,
    );
    let resolver = config.build_resolver();
    let target = id("org.example:lib:1.0");

    assert!(!resolver.is_fetching_cheap(&target));
    let first = resolver.resolve(&target, &ComponentOverride::default());
    assert!(resolver.is_fetching_cheap(&target));

    // Remove the mirror: the second resolution must come from the cache.
    fs::remove_dir_all(dir.path().join("mirror")).unwrap();
    let second = resolver.resolve(&target, &ComponentOverride::default());

    assert_eq!(first, second);
    let component = second.resolved().unwrap();
    assert_eq!(component.repository, "central");
    assert_eq!(component.dependencies.len(), 1);
}

#[test]
fn test_vendored_copy_takes_priority() {
    let (dir, config) = setup(&[]);
    put(&dir.path().join("vendored"), "org.example:lib:1.0", r#"{"status":"vendored"}"#);
    put(&dir.path().join("mirror/central"), "org.example:lib:1.0", "{}");
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:lib:1.0"), &ComponentOverride::default());

    let component = outcome.resolved().unwrap();
    assert_eq!(component.repository, "vendored");
    assert_eq!(component.status, "vendored");
    assert!(!dir
        .path()
        .join("cache/central/org.example/lib/1.0.json")
        .exists());
}

#[test]
fn test_corrupt_vendored_descriptor_aborts_chain() {
    let (dir, config) = setup(&[]);
    put(&dir.path().join("vendored"), "org.example:lib:1.0", "{broken");
    put(&dir.path().join("mirror/central"), "org.example:lib:1.0", "{}");
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:lib:1.0"), &ComponentOverride::default());

    match outcome {
        Outcome::Failed(ResolveError::RepositoryFailure { repository, .. }) => {
            assert_eq!(repository, "vendored");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_not_found_lists_checked_locations() {
    let (_dir, config) = setup(&[]);
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:absent:1.0"), &ComponentOverride::default());

    let Outcome::NotFound { reports, .. } = &outcome else {
        panic!("expected not found, got {outcome:?}");
    };
    assert_eq!(outcome.checked_repositories(), ["vendored", "central"]);
    assert_eq!(reports[0].attempted_locations.len(), 1);
    assert_eq!(reports[1].attempted_locations.len(), 2);
    assert!(reports[1].attempted_locations[1].contains("mirror"));
}

#[test]
fn test_changing_not_found_lists_only_probed_locations() {
    let (dir, config) = setup(&[]);
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:absent:1.0"), &ComponentOverride::changing());

    let Outcome::NotFound { reports, .. } = &outcome else {
        panic!("expected not found, got {outcome:?}");
    };
    // `vendored` has no mirror, so its cache is still read.
    assert_eq!(reports[0].attempted_locations.len(), 1);
    assert_eq!(reports[1].attempted_locations.len(), 1);
    let mirror = dir.path().join("mirror").display().to_string();
    assert!(reports[1].attempted_locations[0].starts_with(&mirror));
    assert!(reports[1].searched_remotely);
}

#[test]
fn test_percent_in_name_does_not_alias_slash() {
    let (dir, config) = setup(&[]);
    put(&dir.path().join("vendored"), "org:a/b:1", r#"{"status":"slash"}"#);
    let resolver = config.build_resolver();

    let slash = resolver.resolve(&id("org:a/b:1"), &ComponentOverride::default());
    let literal = resolver.resolve(&id("org:a%2Fb:1"), &ComponentOverride::default());

    assert_eq!(slash.resolved().unwrap().status, "slash");
    assert!(literal.is_not_found());
}

#[test]
fn test_rejected_vendored_copy_falls_through() {
    let (dir, config) = setup(&["org.example:lib:1.0"]);
    put(&dir.path().join("vendored"), "org.example:lib:1.0", "{}");
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:lib:1.0"), &ComponentOverride::default());

    assert!(outcome.is_not_found());
}

#[test]
fn test_changing_module_refreshed_from_mirror() {
    let (dir, config) = setup(&[]);
    put(&dir.path().join("cache/central"), "org.example:snap:1.0", r#"{"status":"old"}"#);
    put(&dir.path().join("mirror/central"), "org.example:snap:1.0", r#"{"status":"new"}"#);
    let resolver = config.build_resolver();
    let target = id("org.example:snap:1.0");

    let cached = resolver.resolve(&target, &ComponentOverride::default());
    assert_eq!(cached.resolved().unwrap().status, "old");

    let refreshed = resolver.resolve(&target, &ComponentOverride::changing());
    assert_eq!(refreshed.resolved().unwrap().status, "new");

    let after = resolver.resolve(&target, &ComponentOverride::default());
    assert_eq!(after.resolved().unwrap().status, "new");
}

#[test]
fn test_placeholder_descriptor_used_as_fallback() {
    let (dir, config) = setup(&[]);
    put(&dir.path().join("vendored"), "org.example:gone:1.0", r#"{"missing":true}"#);
    let resolver = config.build_resolver();

    let outcome = resolver.resolve(&id("org.example:gone:1.0"), &ComponentOverride::default());

    let component = outcome.resolved().unwrap();
    assert!(component.missing);
    assert_eq!(component.repository, "vendored");
}
