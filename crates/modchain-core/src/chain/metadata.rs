//! Module metadata as produced by repositories and as handed back to callers.

use super::identity::{IdentityParseError, ModuleComponentId};
use super::repository::ModuleRepository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Status assigned to descriptors that do not declare one.
pub const DEFAULT_STATUS: &str = "release";

/// Caller-supplied hints passed through unchanged to every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentOverride {
    /// The component may change without its version changing, so cached
    /// copies must not be trusted when a fresher source exists.
    #[serde(default)]
    pub changing: bool,
}

impl ComponentOverride {
    /// Overrides for a changing component.
    #[must_use]
    pub fn changing() -> Self {
        Self { changing: true }
    }
}

/// On-disk / wire shape of a module descriptor.
///
/// The identity is implied by where the descriptor lives, so it is not
/// repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// The repository knows this version and positively states it does not
    /// exist.
    #[serde(default)]
    pub missing: bool,
}

impl Default for ModuleDescriptor {
    fn default() -> Self {
        Self {
            status: default_status(),
            dependencies: Vec::new(),
            missing: false,
        }
    }
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Metadata a repository produced for one module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMetadata {
    pub id: ModuleComponentId,
    pub status: String,
    pub dependencies: Vec<ModuleComponentId>,
    /// Placeholder for a version the repository knows to be absent.
    pub missing: bool,
    /// BLAKE3 digest of the descriptor bytes, when the source had them.
    pub descriptor_hash: Option<String>,
}

impl ModuleMetadata {
    /// Genuine metadata with default status and no dependencies.
    #[must_use]
    pub fn new(id: ModuleComponentId) -> Self {
        Self {
            id,
            status: DEFAULT_STATUS.to_string(),
            dependencies: Vec::new(),
            missing: false,
            descriptor_hash: None,
        }
    }

    /// "Known missing version" placeholder.
    #[must_use]
    pub fn placeholder(id: ModuleComponentId) -> Self {
        Self {
            missing: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, dep: ModuleComponentId) -> Self {
        self.dependencies.push(dep);
        self
    }

    #[must_use]
    pub fn with_descriptor_hash(mut self, hash: impl Into<String>) -> Self {
        self.descriptor_hash = Some(hash.into());
        self
    }

    /// Build metadata from a parsed descriptor.
    ///
    /// Fails on the first dependency that is not `group:name:version`.
    pub fn from_descriptor(
        id: ModuleComponentId,
        descriptor: ModuleDescriptor,
    ) -> Result<Self, IdentityParseError> {
        let dependencies = descriptor
            .dependencies
            .iter()
            .map(|dep| dep.parse::<ModuleComponentId>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id,
            status: descriptor.status,
            dependencies,
            missing: descriptor.missing,
            descriptor_hash: None,
        })
    }
}

/// The winning (repository, metadata) pair of a chain search.
#[derive(Clone)]
pub struct ModuleResolution {
    pub repository: Arc<dyn ModuleRepository>,
    pub metadata: ModuleMetadata,
}

impl fmt::Debug for ModuleResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleResolution")
            .field("repository", &self.repository.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Final metadata returned to callers of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedComponent {
    pub id: ModuleComponentId,
    /// Name of the repository that supplied the metadata.
    pub repository: String,
    pub status: String,
    pub dependencies: Vec<ModuleComponentId>,
    /// True when only a "known missing" placeholder could be found.
    pub missing: bool,
    pub descriptor_hash: Option<String>,
}

/// Turns a winning resolution into the metadata handed to callers.
///
/// Must not fail: anything that can go wrong has to be reported by the
/// repository step before the pair reaches the factory.
pub trait MetadataFactory: Send + Sync {
    fn transform(&self, resolution: &ModuleResolution) -> ResolvedComponent;
}

/// Copies the repository's metadata and tags it with the repository name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMetadataFactory;

impl MetadataFactory for DefaultMetadataFactory {
    fn transform(&self, resolution: &ModuleResolution) -> ResolvedComponent {
        let metadata = &resolution.metadata;
        ResolvedComponent {
            id: metadata.id.clone(),
            repository: resolution.repository.name().to_string(),
            status: metadata.status.clone(),
            dependencies: metadata.dependencies.clone(),
            missing: metadata.missing,
            descriptor_hash: metadata.descriptor_hash.clone(),
        }
    }
}
