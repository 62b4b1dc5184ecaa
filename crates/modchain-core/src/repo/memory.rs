//! In-memory repository with fixed answers.
//!
//! Useful for embedding pre-computed metadata and for exercising chain
//! behaviour: every surface counts how often it was asked.

use crate::chain::{
    ComponentOverride, FetchCost, ModuleComponentId, ModuleMetadata, ModuleRepository,
    RepositoryAccess, RepositoryError, StepResult,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed answer for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticEntry {
    Metadata(ModuleMetadata),
    /// "This version is known not to exist."
    Placeholder,
    /// The surface fails with this message.
    Failure(String),
}

#[derive(Debug)]
struct StaticAccess {
    repository: String,
    surface: &'static str,
    entries: BTreeMap<ModuleComponentId, StaticEntry>,
    costs: BTreeMap<ModuleComponentId, FetchCost>,
    default_cost: FetchCost,
    calls: AtomicUsize,
}

impl StaticAccess {
    fn new(repository: &str, surface: &'static str) -> Self {
        Self {
            repository: repository.to_string(),
            surface,
            entries: BTreeMap::new(),
            costs: BTreeMap::new(),
            default_cost: FetchCost::Normal,
            calls: AtomicUsize::new(0),
        }
    }
}

impl RepositoryAccess for StaticAccess {
    fn resolve_metadata(&self, id: &ModuleComponentId, _overrides: &ComponentOverride) -> StepResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.entries.get(id) {
            None => StepResult::Missing,
            Some(StaticEntry::Metadata(metadata)) => StepResult::Resolved(metadata.clone()),
            Some(StaticEntry::Placeholder) => {
                StepResult::Resolved(ModuleMetadata::placeholder(id.clone()))
            }
            Some(StaticEntry::Failure(message)) => {
                StepResult::Failed(RepositoryError::unavailable(message.clone()))
            }
        }
    }

    fn estimate_fetch_cost(&self, id: &ModuleComponentId) -> FetchCost {
        self.costs.get(id).copied().unwrap_or(self.default_cost)
    }

    fn location(&self, id: &ModuleComponentId, _overrides: &ComponentOverride) -> Option<String> {
        Some(format!("memory://{}/{}/{id}", self.repository, self.surface))
    }
}

/// Repository backed by in-memory tables.
#[derive(Debug)]
pub struct StaticRepository {
    name: String,
    local: StaticAccess,
    remote: Option<StaticAccess>,
}

impl StaticRepository {
    /// A local-only repository with no entries.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            local: StaticAccess::new(&name, "local"),
            remote: None,
            name,
        }
    }

    /// Give the repository an (initially empty) remote surface.
    #[must_use]
    pub fn with_remote(mut self) -> Self {
        if self.remote.is_none() {
            self.remote = Some(StaticAccess::new(&self.name, "remote"));
        }
        self
    }

    #[must_use]
    pub fn local_entry(mut self, id: ModuleComponentId, entry: StaticEntry) -> Self {
        self.local.entries.insert(id, entry);
        self
    }

    /// Add a remote answer, creating the remote surface if needed.
    #[must_use]
    pub fn remote_entry(self, id: ModuleComponentId, entry: StaticEntry) -> Self {
        let mut repo = self.with_remote();
        if let Some(remote) = repo.remote.as_mut() {
            remote.entries.insert(id, entry);
        }
        repo
    }

    /// Local fetch-cost estimate for one identity.
    #[must_use]
    pub fn local_cost(mut self, id: ModuleComponentId, cost: FetchCost) -> Self {
        self.local.costs.insert(id, cost);
        self
    }

    /// Local fetch-cost estimate for identities without a specific one.
    #[must_use]
    pub fn default_local_cost(mut self, cost: FetchCost) -> Self {
        self.local.default_cost = cost;
        self
    }

    /// How many times the local surface was asked to resolve.
    #[must_use]
    pub fn local_calls(&self) -> usize {
        self.local.calls.load(Ordering::SeqCst)
    }

    /// How many times the remote surface was asked to resolve.
    #[must_use]
    pub fn remote_calls(&self) -> usize {
        self.remote
            .as_ref()
            .map_or(0, |remote| remote.calls.load(Ordering::SeqCst))
    }
}

impl ModuleRepository for StaticRepository {
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
