//! Repository-chain metadata resolution.
//!
//! Provides:
//! - Component identities and override hints
//! - The repository seam (local and remote access surfaces, fetch costs)
//! - Per-call attempt state for each repository
//! - The chain resolver with its two-pass search and cost fast path
//! - Outcome and error types

pub mod chooser;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod outcome;
pub mod repository;
pub mod resolver;
pub mod state;

pub use chooser::{AcceptAll, ComponentChooser, RejectRule, RejectRules};
pub use error::{codes as resolve_codes, ResolveError};
pub use identity::{ComponentIdentifier, IdentityParseError, ModuleComponentId};
pub use metadata::{
    ComponentOverride, DefaultMetadataFactory, MetadataFactory, ModuleDescriptor, ModuleMetadata,
    ModuleResolution, ResolvedComponent, DEFAULT_STATUS,
};
pub use outcome::{Outcome, RepositoryReport};
pub use repository::{
    codes as repository_codes, FetchCost, ModuleRepository, RepositoryAccess, RepositoryError,
    StepResult,
};
pub use resolver::ChainResolver;
pub use state::{Progress, ResolveAttemptState};
