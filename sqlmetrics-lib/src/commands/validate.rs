use super::Host;
use super::common::{ColorMode, ProjectArgs};
use crate::Result;
use crate::definitions::{discover, validate_file};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::app_err;
use owo_colors::OwoColorize;
use std::io::Write;

/// Exit code when the directory holds no definitions
const EXIT_NO_DEFINITIONS: i32 = 1;

/// Exit code when at least one definition has errors
const EXIT_INVALID: i32 = 2;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Directory containing metric definitions (default is the configured metrics directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

/// Validates every definition in a directory, reporting all problems in all files
///
/// # Errors
///
/// Returns an error if no definitions are found, if any definition is invalid, or if the
/// configuration cannot be loaded
pub fn validate_definitions<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let dir = if let Some(dir) = &args.dir {
        super::common::init_logging(args.project.log_level);
        dir.clone()
    } else {
        match args.project.resolve() {
            Ok(paths) => paths.metrics_dir,
            Err(e) => {
                let _ = writeln!(host.error(), "❌ {e:#}");
                host.exit(1);
                return Err(e);
            }
        }
    };

    let paths = discover(&dir);
    if paths.is_empty() {
        let _ = writeln!(host.output(), "No YAML files found in {dir}");
        host.exit(EXIT_NO_DEFINITIONS);
        return Err(app_err!("no metric definitions found in {dir}"));
    }

    let use_colors = args.color.use_colors();
    let mut failed = 0_usize;

    for path in &paths {
        let report = validate_file(path);
        let file_name = path.file_name().unwrap_or(path.as_str());

        if report.is_ok() {
            if use_colors {
                let _ = writeln!(host.output(), "{} {file_name}", "OK:".green().bold());
            } else {
                let _ = writeln!(host.output(), "OK: {file_name}");
            }
            continue;
        }

        failed += 1;
        if use_colors {
            let _ = writeln!(host.output(), "{} {file_name}:", "ERRORS in".red().bold());
        } else {
            let _ = writeln!(host.output(), "ERRORS in {file_name}:");
        }

        for error in report.errors() {
            let _ = writeln!(host.output(), "  - {error}");
        }
    }

    if failed > 0 {
        host.exit(EXIT_INVALID);
        return Err(app_err!("{failed} of {} metric definition(s) failed validation", paths.len()));
    }

    Ok(())
}
