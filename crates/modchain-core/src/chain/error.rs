//! Resolution error taxonomy.

use super::identity::{ComponentIdentifier, ModuleComponentId};
use super::repository::RepositoryError;
use thiserror::Error;

/// Resolution error codes.
pub mod codes {
    pub const RESOLVE_UNSUPPORTED_IDENTITY: &str = "RESOLVE_UNSUPPORTED_IDENTITY";
    pub const RESOLVE_REPOSITORY_FAILURE: &str = "RESOLVE_REPOSITORY_FAILURE";
    pub const RESOLVE_ILLEGAL_STATE: &str = "RESOLVE_ILLEGAL_STATE";
}

/// Why a resolution call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Only module components can be resolved against a repository chain.
    #[error("Can resolve metadata for module components only, got {id}")]
    UnsupportedIdentity { id: ComponentIdentifier },

    /// A repository step failed; the chain search stopped there.
    #[error("Could not resolve {id}: repository '{repository}' failed")]
    RepositoryFailure {
        id: ModuleComponentId,
        repository: String,
        #[source]
        source: RepositoryError,
    },

    /// An attempt step was driven out of phase order. Always a bug.
    #[error("Illegal resolve state for {id} in '{repository}': {reason}")]
    IllegalState {
        id: ModuleComponentId,
        repository: String,
        reason: String,
    },
}

impl ResolveError {
    /// Stable code for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedIdentity { .. } => codes::RESOLVE_UNSUPPORTED_IDENTITY,
            Self::RepositoryFailure { .. } => codes::RESOLVE_REPOSITORY_FAILURE,
            Self::IllegalState { .. } => codes::RESOLVE_ILLEGAL_STATE,
        }
    }

    /// The repository involved, if any.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        match self {
            Self::UnsupportedIdentity { .. } => None,
            Self::RepositoryFailure { repository, .. } | Self::IllegalState { repository, .. } => {
                Some(repository)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_repository_failure_keeps_cause() {
        let err = ResolveError::RepositoryFailure {
            id: ModuleComponentId::new("g", "n", "1"),
            repository: "central".to_string(),
            source: RepositoryError::unavailable("connection refused"),
        };
        assert_eq!(err.code(), codes::RESOLVE_REPOSITORY_FAILURE);
        assert_eq!(err.repository(), Some("central"));
        assert!(err.to_string().contains("g:n:1"));
        assert!(err
            .source()
            .unwrap()
            .to_string()
            .contains("connection refused"));
    }

    #[test]
    fn test_unsupported_identity_message() {
        let err = ResolveError::UnsupportedIdentity {
            id: ComponentIdentifier::project(":app"),
        };
        assert_eq!(err.code(), codes::RESOLVE_UNSUPPORTED_IDENTITY);
        assert!(err.repository().is_none());
        assert!(err.to_string().contains("project :app"));
    }
}
