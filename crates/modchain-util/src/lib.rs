#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for modchain.
//!
//! Pure helpers with no logging/tracing dependencies; logging belongs to the
//! CLI crate.

pub mod fs;
pub mod hash;
