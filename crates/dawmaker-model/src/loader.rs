use std::path::Path;

use crate::lint;
use crate::parser;
use crate::schema_def;
use crate::types::error::{ErrorEntry, ValidationReport};
use crate::types::project::LayoutDocument;

/// Load a layout file: JSON syntax, then schema, then typed parse, then lint.
/// Lint findings are returned in the report; only unusable files are errors.
#[allow(clippy::result_large_err)]
pub fn load_layout(path: &Path) -> Result<(LayoutDocument, ValidationReport), LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_string_lossy().into_owned()));
    }

    let file = display_name(path);
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string_lossy().into_owned(),
        source,
    })?;

    let value = parser::parse_json(&content, &file).map_err(LoadError::Parse)?;
    let violations = schema_def::validate_layout_value(&value, &file);
    if !violations.is_empty() {
        log::debug!("{file}: {} schema violation(s)", violations.len());
        return Err(LoadError::Schema(ValidationReport::from_errors(violations)));
    }

    let doc = parser::parse_layout(&content, &file).map_err(LoadError::Parse)?;
    let report = lint::check(&doc, &file);
    log::debug!(
        "loaded {file}: {} widget(s), {} diagnostic(s)",
        doc.widgets.len(),
        report.errors.len()
    );
    Ok((doc, report))
}

/// Write a layout as pretty JSON, creating parent directories
pub fn save_layout(path: &Path, doc: &LayoutDocument) -> Result<(), LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: path.to_string_lossy().into_owned(),
        source,
    };
    let text = parser::to_layout_json(doc).map_err(|e| io_err(e.into()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Errors that prevent a layout from loading at all
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("layout file not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", .0.message)]
    Parse(ErrorEntry),

    #[error("layout does not match the schema ({} violation(s))", .0.errors.len())]
    Schema(ValidationReport),
}

impl LoadError {
    /// Structured diagnostics carried by the error, if any
    pub fn entries(&self) -> Vec<ErrorEntry> {
        match self {
            LoadError::Parse(entry) => vec![entry.clone()],
            LoadError::Schema(report) => report.errors.clone(),
            LoadError::NotFound(_) | LoadError::Io { .. } => Vec::new(),
        }
    }
}
