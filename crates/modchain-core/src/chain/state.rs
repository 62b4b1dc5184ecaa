//! Per-repository, per-call resolution progress.

use super::chooser::ComponentChooser;
use super::error::ResolveError;
use super::identity::ModuleComponentId;
use super::metadata::ComponentOverride;
use super::outcome::RepositoryReport;
use super::repository::{ModuleRepository, RepositoryAccess, StepResult};
use std::sync::Arc;
use tracing::{debug, trace};

/// How far an attempt has progressed. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NotTried,
    LocalTried,
    RemoteTried,
}

/// Tracks which surfaces of one repository have been asked about one
/// identity during one resolution call.
///
/// Created at the start of a call and dropped at its end; never shared.
pub struct ResolveAttemptState<'a> {
    id: &'a ModuleComponentId,
    overrides: &'a ComponentOverride,
    repository: &'a Arc<dyn ModuleRepository>,
    chooser: &'a dyn ComponentChooser,
    progress: Progress,
    last_result: Option<StepResult>,
    attempted_locations: Vec<String>,
}

impl<'a> ResolveAttemptState<'a> {
    pub fn new(
        id: &'a ModuleComponentId,
        overrides: &'a ComponentOverride,
        repository: &'a Arc<dyn ModuleRepository>,
        chooser: &'a dyn ComponentChooser,
    ) -> Self {
        Self {
            id,
            overrides,
            repository,
            chooser,
            progress: Progress::NotTried,
            last_result: None,
            attempted_locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &'a ModuleComponentId {
        self.id
    }

    #[must_use]
    pub fn repository(&self) -> &'a Arc<dyn ModuleRepository> {
        self.repository
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Result of the most recent step.
    #[must_use]
    pub fn last_result(&self) -> Option<&StepResult> {
        self.last_result.as_ref()
    }

    /// Ask the repository's local surface. Allowed exactly once, first.
    pub fn resolve_local(&mut self) -> Result<StepResult, ResolveError> {
        if self.progress != Progress::NotTried {
            return Err(self.illegal("local step already attempted"));
        }
        let repository = self.repository;
        self.progress = Progress::LocalTried;
        Ok(self.process(repository.local_access(), "local"))
    }

    /// Ask the repository's remote surface. Allowed exactly once, after the
    /// local step, and only for repositories that have a remote surface.
    pub fn resolve_remote(&mut self) -> Result<StepResult, ResolveError> {
        match self.progress {
            Progress::NotTried => return Err(self.illegal("remote step before local step")),
            Progress::RemoteTried => return Err(self.illegal("remote step already attempted")),
            Progress::LocalTried => {}
        }
        let repository = self.repository;
        let Some(remote) = repository.remote_access() else {
            return Err(self.illegal("repository has no remote access"));
        };
        self.progress = Progress::RemoteTried;
        Ok(self.process(remote, "remote"))
    }

    /// True once the local step is done, the remote step is still pending and
    /// the repository has a remote surface to ask.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.progress == Progress::LocalTried && self.repository.remote_access().is_some()
    }

    /// This attempt's contribution to a NotFound outcome.
    #[must_use]
    pub fn report(&self) -> RepositoryReport {
        RepositoryReport {
            repository: self.repository.name().to_string(),
            searched_locally: self.progress != Progress::NotTried,
            searched_remotely: self.progress == Progress::RemoteTried,
            attempted_locations: self.attempted_locations.clone(),
        }
    }

    fn process(&mut self, access: &dyn RepositoryAccess, surface: &'static str) -> StepResult {
        if let Some(location) = access.location(self.id, self.overrides) {
            self.attempted_locations.push(location);
        }

        let mut result = access.resolve_metadata(self.id, self.overrides);
        if let StepResult::Resolved(metadata) = &result {
            if self.chooser.is_rejected(self.id, metadata) {
                debug!(
                    component = %self.id,
                    repository = self.repository.name(),
                    "Rejected by component selection rules"
                );
                result = StepResult::Missing;
            }
        }

        trace!(
            component = %self.id,
            repository = self.repository.name(),
            surface,
            result = result.label(),
            "Repository step finished"
        );
        self.last_result = Some(result.clone());
        result
    }

    fn illegal(&self, reason: &str) -> ResolveError {
        ResolveError::IllegalState {
            id: self.id.clone(),
            repository: self.repository.name().to_string(),
            reason: reason.to_string(),
        }
    }
}
