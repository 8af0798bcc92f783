//! Execution and materialization of metrics against DuckDB
//!
//! All state lives in one database: the base tables loaded from CSV files, one table per
//! metric, and the `metric_registry` table describing those metrics. Each run replaces all
//! three wholesale, so running twice with the same inputs leaves the database unchanged.
//!
//! # Implementation Model
//!
//! A [`Database`] is opened once per run and borrowed by every operation; there is no
//! global connection. Execution is strictly sequential:
//!
//! 1. [`ExecutionPlan::load`] reads and gates every definition without touching the database.
//! 2. [`load_base_tables`] drops and reloads `customers`, `orders`, and `order_items`.
//! 3. [`run_metric`] runs for each metric in file-name order, creating the metric's table
//!    and then upserting its registry row.
//!
//! Only identifiers are interpolated into SQL, and only after passing the allow-list check.
//! Literal values such as file paths and registry fields are always bound as parameters.

mod base_tables;
mod database;
mod materializer;
mod pipeline;
mod registry;

pub use base_tables::{BaseTable, load_base_tables};
pub use database::Database;
pub use materializer::run_metric;
pub use pipeline::{ExecutionPlan, PlannedMetric, RunSummary};
pub use registry::{REGISTRY_TABLE, RegistryEntry, ensure_registry, entries as registry_entries, upsert as upsert_registry_entry};
