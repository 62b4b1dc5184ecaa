//! Concrete repositories.

pub mod directory;
pub mod memory;

pub use directory::{descriptor_path, DirectoryRepository, CHECKSUM_EXTENSION};
pub use memory::{StaticEntry, StaticRepository};
