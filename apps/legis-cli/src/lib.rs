//! Command-line front end for the legislation browser
//!
//! Loads the source tables named in a TOML config, builds the corpus once,
//! and prints JSON for one command.

pub mod cli;
pub mod config;
pub mod sources;

pub use cli::{execute, Cli, Command, FilterArgs};
pub use config::{CliConfig, SourcePaths};
pub use sources::load_tables;
