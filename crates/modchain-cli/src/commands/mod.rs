pub mod cost;
pub mod repos;
pub mod resolve;
pub mod version;

use modchain_core::chain::ComponentIdentifier;
use modchain_core::paths::find_chain_file;
use modchain_core::{ChainConfig, Config, Error};
use std::path::PathBuf;
use tracing::debug;

/// Exit code for bad input: unparsable identities or unusable chain config.
pub const EXIT_USAGE: i32 = 2;

/// Locate the chain config: `--chain`/`MODCHAIN_CHAIN`, else the nearest
/// `modchain.json` above the working directory.
fn chain_path(config: &Config) -> Result<PathBuf, Error> {
    if let Some(path) = &config.chain_file {
        return Ok(if path.is_absolute() {
            path.clone()
        } else {
            config.cwd.join(path)
        });
    }
    find_chain_file(&config.cwd).ok_or_else(|| Error::ChainConfigNotFound {
        start: config.cwd.clone(),
    })
}

/// Load the chain config, exiting with [`EXIT_USAGE`] if it cannot be used.
pub fn load_chain_or_exit(config: &Config) -> ChainConfig {
    let loaded = chain_path(config).and_then(|path| {
        debug!(path = %path.display(), "Loading chain config");
        ChainConfig::load(&path)
    });
    match loaded {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("hint: pass --chain <FILE> or create modchain.json");
            std::process::exit(EXIT_USAGE);
        }
    }
}

/// Parse identities, exiting with [`EXIT_USAGE`] on the first bad one.
pub fn parse_ids_or_exit(raw: &[String]) -> Vec<ComponentIdentifier> {
    raw.iter()
        .map(|s| match s.parse::<ComponentIdentifier>() {
            Ok(id) => id,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(EXIT_USAGE);
            }
        })
        .collect()
}
