use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modchain configuration and setup.
///
/// Resolution itself never returns this type; see
/// [`ResolveError`](crate::chain::ResolveError).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read chain config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chain config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid chain config at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("No chain config found from {start}")]
    ChainConfigNotFound { start: PathBuf },
}
