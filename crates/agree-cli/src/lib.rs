//! Schema comparison CLI library.
//!
//! This crate provides the CLI interface over `agree-core`: argument
//! parsing, configuration, schema files and report output.

mod cli;
pub mod commands;
mod config;
pub mod input;

pub use cli::{Affectation, Cli, Commands, ToleranceArgs};
pub use config::Config;
