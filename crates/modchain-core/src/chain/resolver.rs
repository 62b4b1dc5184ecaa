//! Resolution of module metadata across an ordered repository chain.
//!
//! Every call searches in two passes. The local pass asks each repository's
//! cache-backed surface in chain order; only if that produces no genuine hit
//! does the remote pass ask the repositories that still have a remote surface
//! to try. A failure in any step aborts the call. A "known missing version"
//! placeholder is kept as a fallback and only returned when no repository
//! supplies genuine metadata.

use super::chooser::{AcceptAll, ComponentChooser};
use super::error::ResolveError;
use super::identity::{ComponentIdentifier, ModuleComponentId};
use super::metadata::{
    ComponentOverride, DefaultMetadataFactory, MetadataFactory, ModuleResolution,
};
use super::outcome::Outcome;
use super::repository::{ModuleRepository, StepResult};
use super::state::ResolveAttemptState;
use rayon::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Which surface a pass asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Local,
    Remote,
}

/// Resolves component metadata against an ordered chain of repositories.
///
/// Repositories are added with [`ChainResolver::add`], which needs `&mut self`;
/// resolution only needs `&self`. Once configured, the resolver can be shared
/// (for example behind an `Arc`) by any number of concurrent callers.
pub struct ChainResolver {
    repositories: Vec<Arc<dyn ModuleRepository>>,
    repository_names: Vec<String>,
    chooser: Arc<dyn ComponentChooser>,
    factory: Arc<dyn MetadataFactory>,
}

impl fmt::Debug for ChainResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainResolver")
            .field("repositories", &self.repository_names)
            .finish_non_exhaustive()
    }
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new(Arc::new(AcceptAll), Arc::new(DefaultMetadataFactory))
    }
}

impl ChainResolver {
    /// Create an empty chain.
    #[must_use]
    pub fn new(chooser: Arc<dyn ComponentChooser>, factory: Arc<dyn MetadataFactory>) -> Self {
        Self {
            repositories: Vec::new(),
            repository_names: Vec::new(),
            chooser,
            factory,
        }
    }

    /// Append a repository. Earlier repositories take priority.
    pub fn add(&mut self, repository: Arc<dyn ModuleRepository>) {
        self.repository_names.push(repository.name().to_string());
        self.repositories.push(repository);
    }

    /// Repository names in priority order.
    #[must_use]
    pub fn repository_names(&self) -> &[String] {
        &self.repository_names
    }

    /// Resolve metadata for `id`.
    pub fn resolve(&self, id: &ComponentIdentifier, overrides: &ComponentOverride) -> Outcome {
        let Some(module) = id.as_module() else {
            return Outcome::Failed(ResolveError::UnsupportedIdentity { id: id.clone() });
        };
        self.resolve_module(module, overrides)
    }

    /// Resolve many identities in parallel.
    ///
    /// Each call gets its own attempt states; outcomes are returned in
    /// request order.
    pub fn resolve_all(&self, requests: &[(ComponentIdentifier, ComponentOverride)]) -> Vec<Outcome> {
        requests
            .par_iter()
            .map(|(id, overrides)| self.resolve(id, overrides))
            .collect()
    }

    /// Estimate whether fetching metadata for `id` is cheap, without
    /// fetching it.
    ///
    /// The first repository with a definite opinion decides: fast means
    /// cheap, expensive means not cheap. With no definite opinion, or for a
    /// non-module identity, fetching is assumed cheap.
    #[must_use]
    pub fn is_fetching_cheap(&self, id: &ComponentIdentifier) -> bool {
        let Some(module) = id.as_module() else {
            return true;
        };
        for repository in &self.repositories {
            let cost = repository.local_access().estimate_fetch_cost(module);
            if cost.is_fast() {
                return true;
            } else if cost.is_expensive() {
                return false;
            }
        }
        true
    }

    fn resolve_module(&self, id: &ModuleComponentId, overrides: &ComponentOverride) -> Outcome {
        debug!(
            component = %id,
            repositories = ?self.repository_names,
            "Attempting to resolve component"
        );

        let mut states: Vec<ResolveAttemptState<'_>> = self
            .repositories
            .iter()
            .map(|repository| {
                ResolveAttemptState::new(id, overrides, repository, self.chooser.as_ref())
            })
            .collect();

        match find_best_match(&mut states) {
            Ok(Some(resolution)) => {
                debug!(
                    component = %resolution.metadata.id,
                    repository = resolution.repository.name(),
                    missing = resolution.metadata.missing,
                    "Using component"
                );
                Outcome::Resolved(self.factory.transform(&resolution))
            }
            Ok(None) => {
                let reports = states.iter().map(ResolveAttemptState::report).collect();
                debug!(component = %id, "Component not found in any repository");
                Outcome::NotFound {
                    id: id.clone(),
                    reports,
                }
            }
            Err(err) => {
                debug!(component = %id, error = %err, "Resolution failed");
                Outcome::Failed(err)
            }
        }
    }
}

/// Run the local pass, then the remote pass over whatever is left to retry.
fn find_best_match(
    states: &mut [ResolveAttemptState<'_>],
) -> Result<Option<ModuleResolution>, ResolveError> {
    let mut queue: VecDeque<usize> = (0..states.len()).collect();
    let mut retry: VecDeque<usize> = VecDeque::new();
    let mut best: Option<ModuleResolution> = None;

    if let Some(found) = scan(states, &mut queue, &mut retry, &mut best, Pass::Local)? {
        return Ok(Some(found));
    }
    if retry.is_empty() {
        return Ok(best);
    }

    queue.append(&mut retry);
    if let Some(found) = scan(states, &mut queue, &mut retry, &mut best, Pass::Remote)? {
        return Ok(Some(found));
    }
    Ok(best)
}

/// Drain `queue`, returning the first genuine hit.
///
/// Missing attempts that can still widen to their remote surface go to
/// `retry`. The first placeholder seen is kept in `best`; later ones are
/// ignored.
fn scan(
    states: &mut [ResolveAttemptState<'_>],
    queue: &mut VecDeque<usize>,
    retry: &mut VecDeque<usize>,
    best: &mut Option<ModuleResolution>,
    pass: Pass,
) -> Result<Option<ModuleResolution>, ResolveError> {
    while let Some(index) = queue.pop_front() {
        let state = &mut states[index];
        let result = match pass {
            Pass::Local => state.resolve_local()?,
            Pass::Remote => state.resolve_remote()?,
        };

        match result {
            StepResult::Failed(source) => {
                return Err(ResolveError::RepositoryFailure {
                    id: state.id().clone(),
                    repository: state.repository().name().to_string(),
                    source,
                });
            }
            StepResult::Missing => {
                if state.can_retry() {
                    retry.push_back(index);
                }
            }
            StepResult::Resolved(metadata) => {
                let resolution = ModuleResolution {
                    repository: Arc::clone(state.repository()),
                    metadata,
                };
                if !resolution.metadata.missing {
                    return Ok(Some(resolution));
                }
                if best.is_none() {
                    *best = Some(resolution);
                }
            }
        }
    }
    Ok(None)
}
