//! The repository seam: what the chain needs from a metadata source.

use super::identity::ModuleComponentId;
use super::metadata::{ComponentOverride, ModuleMetadata};
use std::fmt;
use std::io;

/// Repository error codes.
pub mod codes {
    pub const REPO_IO: &str = "REPO_IO";
    pub const REPO_METADATA_INVALID: &str = "REPO_METADATA_INVALID";
    pub const REPO_CHECKSUM_MISMATCH: &str = "REPO_CHECKSUM_MISMATCH";
    pub const REPO_UNAVAILABLE: &str = "REPO_UNAVAILABLE";
}

/// An unrecoverable failure inside one repository access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    code: &'static str,
    message: String,
}

impl RepositoryError {
    /// Create a new error with the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(codes::REPO_IO, msg)
    }

    pub fn metadata_invalid(msg: impl Into<String>) -> Self {
        Self::new(codes::REPO_METADATA_INVALID, msg)
    }

    #[must_use]
    pub fn checksum_mismatch(location: &str) -> Self {
        Self::new(
            codes::REPO_CHECKSUM_MISMATCH,
            format!("Checksum mismatch for {location}"),
        )
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(codes::REPO_UNAVAILABLE, msg)
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RepositoryError {}

impl From<io::Error> for RepositoryError {
    fn from(e: io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::metadata_invalid(format!("Invalid JSON: {e}"))
    }
}

/// What one access surface answered for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The access failed; the whole chain search must stop.
    Failed(RepositoryError),
    /// Nothing known here.
    Missing,
    /// Metadata found. May still be a "known missing" placeholder, see
    /// [`ModuleMetadata::missing`].
    Resolved(ModuleMetadata),
}

impl StepResult {
    /// Short label for diagnostics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Failed(_) => "failed",
            Self::Missing => "missing",
            Self::Resolved(m) if m.missing => "placeholder",
            Self::Resolved(_) => "resolved",
        }
    }
}

/// Rough cost of fetching metadata from a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchCost {
    /// Available without any I/O beyond what is already cached.
    Fast,
    /// No strong opinion either way.
    Normal,
    /// Would require remote work.
    Expensive,
}

impl FetchCost {
    #[must_use]
    pub fn is_fast(self) -> bool {
        self == Self::Fast
    }

    #[must_use]
    pub fn is_expensive(self) -> bool {
        self == Self::Expensive
    }
}

/// One access surface (local or remote) of a repository.
///
/// Implementations are shared by every in-flight resolution and must be safe
/// to call concurrently.
pub trait RepositoryAccess: Send + Sync {
    /// Look up metadata for `id`.
    fn resolve_metadata(&self, id: &ModuleComponentId, overrides: &ComponentOverride)
        -> StepResult;

    /// Estimate the cost of fetching metadata for `id`.
    ///
    /// Must not fetch, and must only touch state that is already cached.
    fn estimate_fetch_cost(&self, _id: &ModuleComponentId) -> FetchCost {
        FetchCost::Normal
    }

    /// Where this surface looks for `id` under `overrides`, for "checked
    /// these locations" diagnostics. `None` when it does not look anywhere.
    fn location(&self, _id: &ModuleComponentId, _overrides: &ComponentOverride) -> Option<String> {
        None
    }
}

/// A named metadata source in a repository chain.
pub trait ModuleRepository: Send + Sync {
    /// Stable name used in diagnostics.
    fn name(&self) -> &str;

    /// Cache/disk-backed lookup.
    fn local_access(&self) -> &dyn RepositoryAccess;

    /// Network-backed lookup. `None` for local-only repositories.
    fn remote_access(&self) -> Option<&dyn RepositoryAccess>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        let err = RepositoryError::metadata_invalid("bad descriptor");
        assert_eq!(err.code(), codes::REPO_METADATA_INVALID);
        assert_eq!(err.message(), "bad descriptor");
        assert!(err.to_string().contains(codes::REPO_METADATA_INVALID));
    }

    #[test]
    fn test_error_codes_uppercase() {
        let all_codes = [
            codes::REPO_IO,
            codes::REPO_METADATA_INVALID,
            codes::REPO_CHECKSUM_MISMATCH,
            codes::REPO_UNAVAILABLE,
        ];

        for code in all_codes {
            assert!(
                code.chars().all(|c| c.is_uppercase() || c == '_'),
                "Error code '{code}' should be SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn test_io_error_converts() {
        let err: RepositoryError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.code(), codes::REPO_IO);
    }

    #[test]
    fn test_step_labels() {
        let id = ModuleComponentId::new("g", "n", "1");
        assert_eq!(StepResult::Missing.label(), "missing");
        assert_eq!(
            StepResult::Resolved(ModuleMetadata::new(id.clone())).label(),
            "resolved"
        );
        assert_eq!(
            StepResult::Resolved(ModuleMetadata::placeholder(id)).label(),
            "placeholder"
        );
        assert_eq!(
            StepResult::Failed(RepositoryError::unavailable("down")).label(),
            "failed"
        );
    }
}
