use crate::types::error::{ErrorEntry, E_PARSE_ERROR};
use crate::types::project::LayoutDocument;

pub const LAYOUT_FILE_NAME: &str = "layout.json";

/// Parse a layout document
#[allow(clippy::result_large_err)]
pub fn parse_layout(content: &str, file_path: &str) -> Result<LayoutDocument, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Parse raw JSON without binding it to the layout types, for schema validation
#[allow(clippy::result_large_err)]
pub fn parse_json(content: &str, file_path: &str) -> Result<serde_json::Value, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Pretty JSON with a trailing newline, the on-disk layout form
pub fn to_layout_json(doc: &LayoutDocument) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(doc)?;
    out.push('\n');
    Ok(out)
}

fn serde_error_to_entry(err: serde_json::Error, file_path: &str) -> ErrorEntry {
    let line = err.line();
    let col = err.column();
    let path = format!("$.line:{line}:col:{col}");

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("JSON parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check JSON syntax and widget field types")
}
