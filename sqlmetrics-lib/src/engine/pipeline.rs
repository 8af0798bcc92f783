use super::Database;
use super::base_tables::load_base_tables;
use super::database::LOG_TARGET;
use super::materializer::run_metric;
use crate::definitions::{MetricDefinition, load_all, validate};
use crate::error::PipelineError;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;

/// A metric definition queued for execution, along with the document it came from.
#[derive(Debug, Clone)]
pub struct PlannedMetric {
    pub path: Utf8PathBuf,
    pub definition: MetricDefinition,
}

/// The outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Metric names in the order they were materialized.
    pub executed: Vec<String>,
}

/// Every definition in a directory, gated and ordered for execution.
///
/// Metrics run in file-name order and each is fully materialized before the next starts,
/// so a metric may read the table of any metric whose file sorts before its own. There is
/// no dependency graph: referencing a metric that sorts later fails at execution time.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    metrics: Vec<PlannedMetric>,
}

impl ExecutionPlan {
    /// Loads and gates every definition in `metrics_dir`.
    ///
    /// Nothing here touches the database, so a bad definition anywhere in the set is
    /// rejected before any table is created or replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoDefinitionsFound`], [`PipelineError::Parse`],
    /// [`PipelineError::MissingField`], or [`PipelineError::InvalidDefinition`] for the
    /// first document that fails.
    pub fn load(metrics_dir: &Utf8Path) -> Result<Self, PipelineError> {
        let documents = load_all(metrics_dir)?;

        let mut seen = HashSet::new();
        let mut metrics = Vec::with_capacity(documents.len());

        for doc in documents {
            let file = doc.file_name();
            let definition = MetricDefinition::from_document(file, &doc.document)?;

            let report = validate(&doc.document);
            if !report.is_ok() {
                return Err(PipelineError::InvalidDefinition {
                    file: file.to_string(),
                    errors: report.into_errors(),
                });
            }

            // the engine resolves table names without regard to case
            if !seen.insert(definition.metric_name.to_ascii_lowercase()) {
                log::warn!(
                    target: LOG_TARGET,
                    "Metric '{}' is defined more than once, the definition in '{file}' replaces the earlier one",
                    definition.metric_name
                );
            }

            metrics.push(PlannedMetric { path: doc.path, definition });
        }

        Ok(Self { metrics })
    }

    #[must_use]
    pub fn metrics(&self) -> &[PlannedMetric] {
        &self.metrics
    }

    /// Reloads the base tables from `data_dir`, then materializes every planned metric in
    /// order, stopping at the first failure.
    ///
    /// `on_metric` is called right before each metric executes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SourceUnavailable`] if base data cannot be loaded, or the
    /// first error from [`run_metric`].
    pub fn execute(
        &self,
        db: &Database,
        data_dir: &Utf8Path,
        mut on_metric: impl FnMut(&MetricDefinition),
    ) -> Result<RunSummary, PipelineError> {
        load_base_tables(db, data_dir)?;

        let mut summary = RunSummary::default();
        for planned in &self.metrics {
            on_metric(&planned.definition);
            run_metric(db, &planned.definition)?;
            summary.executed.push(planned.definition.metric_name.clone());
        }

        Ok(summary)
    }
}
