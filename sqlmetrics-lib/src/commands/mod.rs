//! Command-line interface and orchestration for sqlmetrics
//!
//! This module implements the CLI commands and wires the definition and engine modules
//! together. It handles argument parsing, configuration, logging, and console output.
//!
//! ## Commands
//!
//! - **run**: Load base data and materialize every metric, stopping at the first failure.
//!   Exits with status 1 on any failure, including an empty definitions directory.
//! - **validate**: Check every definition and report all problems in all files. Exits
//!   with status 2 if any definition is invalid and 1 if there are no definitions.
//! - **init**: Generate a default configuration file and the project directories
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. Commands write through a [`Host`] so they can be driven
//! from tests, and report failures by calling [`Host::exit`] and returning the error.
//!
//! Configuration is read from an optional `sqlmetrics.toml` in the project directory
//! naming the metrics directory, the data directory, and the database file.

mod common;
mod config;
mod host;
mod init;
mod run;
mod run_metrics;
mod validate;

pub use common::{ColorMode, LogLevel, ProjectArgs};
pub use config::{CONFIG_FILE_NAME, Config, ProjectPaths};
pub use host::Host;
pub use init::{InitArgs, init_project};
pub use run::run;
pub use run_metrics::{RunArgs, run_metrics};
pub use validate::{ValidateArgs, validate_definitions};
