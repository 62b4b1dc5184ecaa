#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod chain;
pub mod config;
pub mod error;
pub mod paths;
pub mod repo;
pub mod version;

pub use chain::{
    ChainResolver, ComponentIdentifier, ComponentOverride, ModuleComponentId, Outcome,
    ResolveError, ResolvedComponent,
};
pub use config::{ChainConfig, Config};
pub use error::Error;
pub use version::VERSION;
