use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "sqlmetrics.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the metric definition documents
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: Utf8PathBuf,

    /// Directory holding the base table CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// DuckDB database file written by the pipeline
    #[serde(default = "default_database")]
    pub database: Utf8PathBuf,
}

fn default_metrics_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("metrics")
}

fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("data")
}

fn default_database() -> Utf8PathBuf {
    Utf8PathBuf::from("metrics.duckdb")
}

/// Project paths with every relative entry resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub metrics_dir: Utf8PathBuf,
    pub data_dir: Utf8PathBuf,
    pub database: Utf8PathBuf,
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `sqlmetrics.toml` in the project directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(project_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading sqlmetrics configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = project_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("No configuration file at '{path}', using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading sqlmetrics configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Resolves the configured paths against `project_dir`.
    #[must_use]
    pub fn resolve(&self, project_dir: &Utf8Path) -> ProjectPaths {
        ProjectPaths {
            metrics_dir: project_dir.join(&self.metrics_dir),
            data_dir: project_dir.join(&self.data_dir),
            database: project_dir.join(&self.database),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a path is empty or the database path names a directory
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("metrics_dir", &self.metrics_dir),
            ("data_dir", &self.data_dir),
            ("database", &self.database),
        ] {
            if value.as_str().trim().is_empty() {
                return Err(app_err!("{key} must not be empty"));
            }
        }

        if self.database.as_str().ends_with('/') || self.database.file_name().is_none() {
            return Err(app_err!("database must name a file, got '{}'", self.database));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
