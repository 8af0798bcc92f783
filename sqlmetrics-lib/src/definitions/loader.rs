use crate::error::PipelineError;
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml::Value;
use std::fs;

/// Log target for the definition loader
const LOG_TARGET: &str = "  loader";

/// Extension a file must carry to be treated as a metric definition.
const DEFINITION_EXTENSION: &str = "yaml";

/// A discovered and parsed definition document.
#[derive(Debug, Clone)]
pub struct DefinitionDocument {
    pub path: Utf8PathBuf,
    pub document: Value,
}

impl DefinitionDocument {
    /// The file name of the document, used in user-facing messages.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}

/// Lists every definition document directly inside `dir`, sorted by file name.
///
/// Hidden files and subdirectories are ignored. A directory that does not exist yields an
/// empty list.
#[must_use]
pub fn discover(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    if !dir.is_dir() {
        log::debug!(target: LOG_TARGET, "Definitions directory '{dir}' does not exist");
        return Vec::new();
    }

    let mut paths = Vec::new();
    for entry_result in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not read entry in '{dir}': {e:#}");
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }

        let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            log::warn!(target: LOG_TARGET, "Skipping definition with a non UTF-8 path in '{dir}'");
            continue;
        };

        let hidden = path.file_name().is_some_and(|name| name.starts_with('.'));
        if hidden || path.extension() != Some(DEFINITION_EXTENSION) {
            continue;
        }

        paths.push(path);
    }

    log::debug!(target: LOG_TARGET, "Discovered {} definition(s) in '{dir}'", paths.len());
    paths
}

/// Reads and parses a single definition document.
///
/// An empty document parses to [`Value::Null`].
///
/// # Errors
///
/// Returns [`PipelineError::Parse`] if the file cannot be read or is not well-formed YAML.
pub fn parse(path: &Utf8Path) -> Result<Value, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_yaml::from_str(&text).map_err(|e| PipelineError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discovers and parses every definition in `dir`, stopping at the first malformed one.
///
/// # Errors
///
/// Returns [`PipelineError::NoDefinitionsFound`] if `dir` holds no documents, or the first
/// [`PipelineError::Parse`] encountered in file-name order.
pub fn load_all(dir: &Utf8Path) -> Result<Vec<DefinitionDocument>, PipelineError> {
    let paths = discover(dir);
    if paths.is_empty() {
        return Err(PipelineError::NoDefinitionsFound { dir: dir.to_path_buf() });
    }

    paths
        .into_iter()
        .map(|path| {
            let document = parse(&path)?;
            Ok(DefinitionDocument { path, document })
        })
        .collect()
}
