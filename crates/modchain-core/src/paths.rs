use crate::version::SCHEMA_VERSION;
use std::path::{Path, PathBuf};

/// File name of the chain configuration.
pub const CHAIN_FILE_NAME: &str = "modchain.json";

/// Environment variable naming the chain configuration file.
pub const CHAIN_ENV: &str = "MODCHAIN_CHAIN";

/// Find the nearest `modchain.json` by walking up from `cwd`.
#[must_use]
pub fn find_chain_file(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        let candidate = current.join(CHAIN_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Get the cache directory for modchain.
///
/// Uses platform-appropriate locations with versioning:
/// - Linux: `$XDG_CACHE_HOME/modchain/v{N}` or `~/.cache/modchain/v{N}`
/// - macOS: `~/Library/Caches/modchain/v{N}`
/// - Windows: `%LOCALAPPDATA%\modchain\v{N}`
#[must_use]
pub fn cache_dir() -> PathBuf {
    let base = dirs_next::cache_dir().map_or_else(
        || {
            dirs_next::home_dir().map_or_else(
                || PathBuf::from(".modchain-cache"),
                |p| p.join(".cache").join("modchain"),
            )
        },
        |p| p.join("modchain"),
    );

    base.join(format!("v{SCHEMA_VERSION}"))
}

/// Default metadata cache for a repository that does not configure one.
#[must_use]
pub fn repository_cache_dir(name: &str) -> PathBuf {
    cache_dir()
        .join("repositories")
        .join(name.replace(['/', '\\'], "_"))
}
