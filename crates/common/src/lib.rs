//! Shared types for vrgen.
//!
//! This crate holds the project configuration consumed by both the generator
//! core and the `vrgen` command line.

pub mod config;
pub mod identifier;

pub use config::{BundlerKind, CONFIG_FILENAMES, ConfigError, GeneratorConfig};
pub use identifier::is_java_identifier;
