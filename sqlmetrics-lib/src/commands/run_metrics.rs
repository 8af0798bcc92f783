use super::Host;
use super::common::ProjectArgs;
use crate::Result;
use crate::engine::{Database, ExecutionPlan};
use crate::error::PipelineError;
use clap::Parser;
use ohno::app_err;
use std::io::Write;

/// Log target for the run command
const LOG_TARGET: &str = "     run";

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// What a run did when it did not fail.
enum Outcome {
    Completed,
    NothingToRun,
}

/// Loads base data and materializes every metric definition, stopping at the first failure
///
/// # Errors
///
/// Returns an error if no definitions are found, a definition is malformed or invalid, base
/// data is unavailable, or any metric fails to execute
pub fn run_metrics<H: Host>(host: &mut H, args: &RunArgs) -> Result<()> {
    match run_metrics_inner(host, args) {
        Ok(Outcome::Completed) => Ok(()),
        Ok(Outcome::NothingToRun) => {
            host.exit(1);
            Err(app_err!("no metric definitions to run"))
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}

fn run_metrics_inner<H: Host>(host: &mut H, args: &RunArgs) -> Result<Outcome> {
    let paths = args.project.resolve()?;

    let plan = match ExecutionPlan::load(&paths.metrics_dir) {
        Ok(plan) => plan,
        Err(e @ PipelineError::NoDefinitionsFound { .. }) => {
            let _ = writeln!(host.output(), "{e}");
            return Ok(Outcome::NothingToRun);
        }
        Err(e) => return Err(app_err!("unable to load metric definitions: {e}")),
    };

    log::info!(target: LOG_TARGET, "Planned {} metric(s) from '{}'", plan.metrics().len(), paths.metrics_dir);

    let db = Database::open(&paths.database).map_err(|e| app_err!("unable to open the metrics database: {e}"))?;
    let summary = plan
        .execute(&db, &paths.data_dir, |definition| {
            let _ = writeln!(host.output(), "Executing metric: {}", definition.metric_name);
        })
        .map_err(|e| app_err!("metric run aborted: {e}"))?;

    log::info!(target: LOG_TARGET, "Materialized {} metric(s)", summary.executed.len());
    let _ = writeln!(host.output(), "Done. DuckDB at: {}", db.location());
    Ok(Outcome::Completed)
}
