//! Result of one chain resolution.

use super::error::ResolveError;
use super::identity::ModuleComponentId;
use super::metadata::ResolvedComponent;
use serde::Serialize;

/// What one repository contributed to a search that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    pub repository: String,
    pub searched_locally: bool,
    pub searched_remotely: bool,
    pub attempted_locations: Vec<String>,
}

/// Final answer of [`ChainResolver::resolve`](super::ChainResolver::resolve).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A repository supplied metadata. `missing` on the component is set when
    /// only a "known missing" placeholder was available.
    Resolved(ResolvedComponent),
    /// No repository knows the component.
    NotFound {
        id: ModuleComponentId,
        reports: Vec<RepositoryReport>,
    },
    Failed(ResolveError),
}

impl Outcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The resolved component, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedComponent> {
        match self {
            Self::Resolved(component) => Some(component),
            _ => None,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&ResolveError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short status label: `resolved`, `not_found` or `failed`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::NotFound { .. } => "not_found",
            Self::Failed(_) => "failed",
        }
    }

    /// Names of the repositories consulted, for a NotFound outcome.
    #[must_use]
    pub fn checked_repositories(&self) -> Vec<&str> {
        match self {
            Self::NotFound { reports, .. } => {
                reports.iter().map(|r| r.repository.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}
