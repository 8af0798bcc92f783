#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for sqlmetrics
//!
//! This library consolidates all functionality for the sqlmetrics tool, which materializes
//! metrics described by YAML documents into tables of a DuckDB database and records each
//! one in a registry table.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`definitions`]: Discovery, parsing, and validation of metric definitions
//! - [`engine`]: Base data loading, metric materialization, and the metric registry
//! - [`error`]: Typed pipeline errors

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod definitions;
#[cfg(not(any(debug_assertions, test)))]
mod definitions;

#[cfg(any(debug_assertions, test))]
pub mod engine;
#[cfg(not(any(debug_assertions, test)))]
mod engine;

pub mod error;

pub use crate::commands::{Host, run};
