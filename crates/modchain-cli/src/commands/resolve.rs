//! `modchain resolve` command implementation.

use modchain_core::chain::{ComponentOverride, Outcome, RepositoryReport, ResolvedComponent};
use modchain_core::Config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::error::Error as _;
use tracing::debug;

/// Schema version of `resolve --json` output.
pub const RESOLVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ResolveJsonOutput {
    schema_version: u32,
    ok: bool,
    results: Vec<ResolveJsonResult>,
}

#[derive(Debug, Serialize)]
struct ResolveJsonResult {
    id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<ResolvedComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checked: Vec<RepositoryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResolveErrorInfo>,
}

#[derive(Debug, Serialize)]
struct ResolveErrorInfo {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

impl ResolveJsonResult {
    fn new(id: String, outcome: &Outcome) -> Self {
        let mut result = Self {
            id,
            status: outcome.label(),
            component: None,
            checked: Vec::new(),
            error: None,
        };
        match outcome {
            Outcome::Resolved(component) => result.component = Some(component.clone()),
            Outcome::NotFound { reports, .. } => result.checked = reports.clone(),
            Outcome::Failed(err) => {
                result.error = Some(ResolveErrorInfo {
                    code: err.code(),
                    message: err.to_string(),
                    repository: err.repository().map(String::from),
                    cause: err.source().map(ToString::to_string),
                });
            }
        }
        result
    }
}

/// Resolve every identity against the configured chain.
///
/// Exits with status 1 if any resolution failed. Not-found components are
/// reported but are not an error.
pub fn run(config: &Config, ids: &[String], changing: bool, json: bool) -> Result<()> {
    let ids = super::parse_ids_or_exit(ids);
    let chain = super::load_chain_or_exit(config);
    let resolver = chain.build_resolver();
    debug!(repositories = ?resolver.repository_names(), count = ids.len(), "Resolving");

    let overrides = ComponentOverride { changing };
    let requests: Vec<_> = ids.iter().map(|id| (id.clone(), overrides.clone())).collect();
    let outcomes = resolver.resolve_all(&requests);
    let any_failed = outcomes.iter().any(Outcome::is_failed);

    if json {
        let output = ResolveJsonOutput {
            schema_version: RESOLVE_SCHEMA_VERSION,
            ok: !any_failed,
            results: ids
                .iter()
                .zip(&outcomes)
                .map(|(id, outcome)| ResolveJsonResult::new(id.to_string(), outcome))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        for (id, outcome) in ids.iter().zip(&outcomes) {
            println!("{}", human_line(&id.to_string(), outcome));
        }
    }

    if any_failed {
        std::process::exit(1);
    }
    Ok(())
}

fn human_line(id: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Resolved(component) if component.missing => {
            format!("{id}  resolved  {} (known missing version)", component.repository)
        }
        Outcome::Resolved(component) => {
            format!("{id}  resolved  {} [{}]", component.repository, component.status)
        }
        Outcome::NotFound { .. } => {
            let checked = outcome.checked_repositories();
            if checked.is_empty() {
                format!("{id}  not found (no repositories configured)")
            } else {
                format!("{id}  not found (checked {})", checked.join(", "))
            }
        }
        Outcome::Failed(err) => match err.source() {
            Some(cause) => format!("{id}  failed  {}: {err}: {cause}", err.code()),
            None => format!("{id}  failed  {}: {err}", err.code()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modchain_core::chain::{ModuleComponentId, ResolveError, RepositoryError};

    fn component(missing: bool) -> ResolvedComponent {
        ResolvedComponent {
            id: ModuleComponentId::new("g", "n", "1"),
            repository: "central".to_string(),
            status: "release".to_string(),
            dependencies: Vec::new(),
            missing,
            descriptor_hash: None,
        }
    }

    #[test]
    fn test_human_line_variants() {
        assert_eq!(
            human_line("g:n:1", &Outcome::Resolved(component(false))),
            "g:n:1  resolved  central [release]"
        );
        assert!(human_line("g:n:1", &Outcome::Resolved(component(true))).contains("known missing"));

        let not_found = Outcome::NotFound {
            id: ModuleComponentId::new("g", "n", "1"),
            reports: vec![RepositoryReport {
                repository: "a".to_string(),
                searched_locally: true,
                searched_remotely: false,
                attempted_locations: Vec::new(),
            }],
        };
        assert_eq!(human_line("g:n:1", &not_found), "g:n:1  not found (checked a)");

        let failed = Outcome::Failed(ResolveError::RepositoryFailure {
            id: ModuleComponentId::new("g", "n", "1"),
            repository: "a".to_string(),
            source: RepositoryError::unavailable("offline"),
        });
        let line = human_line("g:n:1", &failed);
        assert!(line.contains("RESOLVE_REPOSITORY_FAILURE"));
        assert!(line.contains("offline"));
    }

    #[test]
    fn test_json_result_for_failure_has_cause() {
        let failed = Outcome::Failed(ResolveError::RepositoryFailure {
            id: ModuleComponentId::new("g", "n", "1"),
            repository: "a".to_string(),
            source: RepositoryError::unavailable("offline"),
        });
        let result = ResolveJsonResult::new("g:n:1".to_string(), &failed);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"]["repository"], "a");
        assert!(value["error"]["cause"].as_str().unwrap().contains("offline"));
        assert!(value.get("component").is_none());
    }
}
