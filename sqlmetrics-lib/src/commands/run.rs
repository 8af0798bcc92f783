//! Command dispatch logic for sqlmetrics

use super::{InitArgs, RunArgs, ValidateArgs, init_project, run_metrics, validate_definitions};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "sqlmetrics", author, version, long_about = None)]
#[command(about = "Materialize SQL-defined metrics into a DuckDB database")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load base data and materialize every metric definition
    Run(RunArgs),
    /// Check metric definitions without executing them
    Validate(ValidateArgs),
    /// Generate a default configuration file and project layout
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Run(run_args) => run_metrics(host, run_args),
        Command::Validate(validate_args) => validate_definitions(host, validate_args),
        Command::Init(init_args) => init_project(host, init_args),
    }
}
