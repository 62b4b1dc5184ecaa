use crate::chain::{
    AcceptAll, ChainResolver, ComponentChooser, DefaultMetadataFactory, RejectRule, RejectRules,
};
use crate::error::Error;
use crate::paths::repository_cache_dir;
use crate::repo::DirectoryRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runtime configuration for the modchain CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Explicit chain configuration file, if one was given.
    pub chain_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            chain_file: None,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set the chain configuration file.
    #[must_use]
    pub fn with_chain_file(mut self, chain_file: Option<PathBuf>) -> Self {
        self.chain_file = chain_file;
        self
    }
}

/// One repository entry of `modchain.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    pub name: String,
    /// Metadata cache directory. Defaults to the per-user cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<PathBuf>,
    /// Mirror directory serving as the remote source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<PathBuf>,
}

impl RepositoryConfig {
    /// The cache directory this repository will use.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .clone()
            .unwrap_or_else(|| repository_cache_dir(&self.name))
    }
}

/// Contents of `modchain.json`: the repository chain in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
    /// `group:name:version` patterns (`*` per segment) of rejected candidates.
    #[serde(default)]
    pub reject: Vec<String>,
}

impl ChainConfig {
    /// Read, parse and validate a chain config.
    ///
    /// Relative `cache`/`remote` paths are made relative to the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate(path)?;

        let base = path.parent().unwrap_or(Path::new("."));
        for repo in &mut config.repositories {
            repo.cache = repo.cache.take().map(|p| base.join(p));
            repo.remote = repo.remote.take().map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Check names are present and unique and reject rules are well-formed.
    pub fn validate(&self, path: &Path) -> Result<(), Error> {
        let invalid = |reason: String| Error::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let mut seen = HashSet::new();
        for repo in &self.repositories {
            if repo.name.trim().is_empty() {
                return Err(invalid("repository name must not be empty".to_string()));
            }
            if matches!(repo.name.trim(), "." | "..") {
                return Err(invalid(format!("invalid repository name '{}'", repo.name)));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(invalid(format!("duplicate repository name '{}'", repo.name)));
            }
        }
        for pattern in &self.reject {
            if RejectRule::parse(pattern).is_none() {
                return Err(invalid(format!(
                    "invalid reject rule '{pattern}': expected 'group:name:version'"
                )));
            }
        }
        Ok(())
    }

    fn chooser(&self) -> Arc<dyn ComponentChooser> {
        let rules: Vec<RejectRule> = self
            .reject
            .iter()
            .filter_map(|p| RejectRule::parse(p))
            .collect();
        if rules.is_empty() {
            Arc::new(AcceptAll)
        } else {
            Arc::new(RejectRules::new(rules))
        }
    }

    /// Build the resolver for this chain, preserving repository order.
    #[must_use]
    pub fn build_resolver(&self) -> ChainResolver {
        let mut resolver = ChainResolver::new(self.chooser(), Arc::new(DefaultMetadataFactory));
        for repo in &self.repositories {
            let mut repository = DirectoryRepository::new(repo.name.clone(), repo.cache_dir());
            if let Some(remote) = &repo.remote {
                repository = repository.with_remote(remote.clone());
            }
            resolver.add(Arc::new(repository));
        }
        resolver
    }
}
