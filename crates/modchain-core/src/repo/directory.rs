//! Filesystem-backed repository.
//!
//! Layout (both for the cache and for the mirror):
//!
//! ```text
//! <root>/<group>/<name>/<version>.json         descriptor
//! <root>/<group>/<name>/<version>.json.blake3  optional checksum (mirror only)
//! ```
//!
//! The local surface reads the cache. The remote surface reads the mirror,
//! verifies the checksum when one is published, and copies the descriptor
//! into the cache so that later resolutions are served locally.

use crate::chain::{
    ComponentOverride, FetchCost, ModuleComponentId, ModuleDescriptor, ModuleMetadata,
    ModuleRepository, RepositoryAccess, RepositoryError, StepResult,
};
use modchain_util::fs::{atomic_write, read_if_exists};
use modchain_util::hash::{blake3_bytes, blake3_matches};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of the checksum sidecar published next to mirror descriptors.
pub const CHECKSUM_EXTENSION: &str = "blake3";

/// Make a coordinate safe to use as a single path component.
fn encode_segment(segment: &str) -> String {
    let encoded = segment
        .replace('%', "%25")
        .replace('/', "%2F")
        .replace('\\', "%5C");
    if encoded == "." || encoded == ".." {
        encoded.replace('.', "%2E")
    } else {
        encoded
    }
}

/// Path of the descriptor for `id` under `root`.
#[must_use]
pub fn descriptor_path(root: &Path, id: &ModuleComponentId) -> PathBuf {
    root.join(encode_segment(&id.group))
        .join(encode_segment(&id.name))
        .join(format!("{}.json", encode_segment(&id.version)))
}

fn checksum_path(descriptor: &Path) -> PathBuf {
    let mut path = descriptor.as_os_str().to_owned();
    path.push(".");
    path.push(CHECKSUM_EXTENSION);
    PathBuf::from(path)
}

/// Parse descriptor bytes into metadata for `id`.
fn parse_descriptor(
    id: &ModuleComponentId,
    bytes: &[u8],
    location: &Path,
) -> Result<ModuleMetadata, RepositoryError> {
    let descriptor: ModuleDescriptor = serde_json::from_slice(bytes).map_err(|e| {
        RepositoryError::metadata_invalid(format!(
            "Invalid descriptor {}: {e}",
            location.display()
        ))
    })?;
    let metadata = ModuleMetadata::from_descriptor(id.clone(), descriptor).map_err(|e| {
        RepositoryError::metadata_invalid(format!(
            "Invalid dependency '{}' in {}",
            e.input,
            location.display()
        ))
    })?;
    Ok(metadata.with_descriptor_hash(blake3_bytes(bytes)))
}

#[derive(Debug)]
struct CacheAccess {
    root: PathBuf,
    has_remote: bool,
}

impl CacheAccess {
    /// Cached copies of changing modules are refreshed remotely.
    fn skips_cache(&self, overrides: &ComponentOverride) -> bool {
        overrides.changing && self.has_remote
    }
}

impl RepositoryAccess for CacheAccess {
    fn resolve_metadata(&self, id: &ModuleComponentId, overrides: &ComponentOverride) -> StepResult {
        if self.skips_cache(overrides) {
            return StepResult::Missing;
        }

        let path = descriptor_path(&self.root, id);
        match read_if_exists(&path) {
            Ok(None) => StepResult::Missing,
            Ok(Some(bytes)) => match parse_descriptor(id, &bytes, &path) {
                Ok(metadata) => StepResult::Resolved(metadata),
                Err(e) => StepResult::Failed(e),
            },
            Err(e) => StepResult::Failed(RepositoryError::io(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn estimate_fetch_cost(&self, id: &ModuleComponentId) -> FetchCost {
        if descriptor_path(&self.root, id).is_file() {
            FetchCost::Fast
        } else if self.has_remote {
            FetchCost::Expensive
        } else {
            FetchCost::Normal
        }
    }

    fn location(&self, id: &ModuleComponentId, overrides: &ComponentOverride) -> Option<String> {
        if self.skips_cache(overrides) {
            return None;
        }
        Some(descriptor_path(&self.root, id).display().to_string())
    }
}

#[derive(Debug)]
struct MirrorAccess {
    root: PathBuf,
    cache_root: PathBuf,
}

impl MirrorAccess {
    fn fetch(&self, id: &ModuleComponentId) -> Result<Option<ModuleMetadata>, RepositoryError> {
        let path = descriptor_path(&self.root, id);
        let Some(bytes) = read_if_exists(&path).map_err(|e| {
            RepositoryError::unavailable(format!("Failed to read {}: {e}", path.display()))
        })?
        else {
            return Ok(None);
        };

        let sidecar = checksum_path(&path);
        if let Some(expected) = read_if_exists(&sidecar)? {
            let expected = String::from_utf8_lossy(&expected);
            if !blake3_matches(&bytes, &expected) {
                return Err(RepositoryError::checksum_mismatch(
                    &path.display().to_string(),
                ));
            }
        }

        let metadata = parse_descriptor(id, &bytes, &path)?;

        let cached = descriptor_path(&self.cache_root, id);
        atomic_write(&cached, &bytes).map_err(|e| {
            RepositoryError::io(format!("Failed to cache {}: {e}", cached.display()))
        })?;
        debug!(component = %id, path = %cached.display(), "Cached remote descriptor");

        Ok(Some(metadata))
    }
}

impl RepositoryAccess for MirrorAccess {
    fn resolve_metadata(&self, id: &ModuleComponentId, _overrides: &ComponentOverride) -> StepResult {
        match self.fetch(id) {
            Ok(Some(metadata)) => StepResult::Resolved(metadata),
            Ok(None) => StepResult::Missing,
            Err(e) => StepResult::Failed(e),
        }
    }

    fn estimate_fetch_cost(&self, _id: &ModuleComponentId) -> FetchCost {
        FetchCost::Expensive
    }

    fn location(&self, id: &ModuleComponentId, _overrides: &ComponentOverride) -> Option<String> {
        Some(descriptor_path(&self.root, id).display().to_string())
    }
}

/// Repository reading descriptors from a cache directory and, optionally, a
/// mirror directory standing in for the remote source.
#[derive(Debug)]
pub struct DirectoryRepository {
    name: String,
    local: CacheAccess,
    remote: Option<MirrorAccess>,
}

impl DirectoryRepository {
    /// A local-only repository over `cache`.
    pub fn new(name: impl Into<String>, cache: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            local: CacheAccess {
                root: cache.into(),
                has_remote: false,
            },
            remote: None,
        }
    }

    /// Add a mirror directory as the remote surface.
    #[must_use]
    pub fn with_remote(mut self, mirror: impl Into<PathBuf>) -> Self {
        self.local.has_remote = true;
        self.remote = Some(MirrorAccess {
            root: mirror.into(),
            cache_root: self.local.root.clone(),
        });
        self
    }
}

impl ModuleRepository for DirectoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn local_access(&self) -> &dyn RepositoryAccess {
        &self.local
    }

    fn remote_access(&self) -> Option<&dyn RepositoryAccess> {
        self.remote.as_ref().map(|remote| remote as &dyn RepositoryAccess)
    }
}
