use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::Severity;

// ── Diagnostic code constants ──

pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_SCHEMA_VIOLATION: &str = "E_SCHEMA_VIOLATION";
pub const E_MISSING_PLUGIN_NAME: &str = "E_MISSING_PLUGIN_NAME";
pub const E_FORMAT_VERSION: &str = "E_FORMAT_VERSION";
pub const W_INVALID_VERSION: &str = "W_INVALID_VERSION";
pub const W_DUPLICATE_NAME: &str = "W_DUPLICATE_NAME";
pub const W_IDENTIFIER_REWRITTEN: &str = "W_IDENTIFIER_REWRITTEN";
pub const W_MIDI_CC_RANGE: &str = "W_MIDI_CC_RANGE";
pub const W_MIDI_CHANNEL_RANGE: &str = "W_MIDI_CHANNEL_RANGE";
pub const W_MIDI_IGNORED: &str = "W_MIDI_IGNORED";
pub const W_EMPTY_OPTIONS: &str = "W_EMPTY_OPTIONS";
pub const W_UNSUPPORTED_FORMAT: &str = "W_UNSUPPORTED_FORMAT";
pub const W_ZERO_SIZE: &str = "W_ZERO_SIZE";

/// A single diagnostic produced while parsing or linting a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable code
    pub code: String,
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Layout file the entry refers to
    pub file: String,
    /// JSONPath to the offending field
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorEntry {
    fn new(
        code: &str,
        severity: Severity,
        message: impl Into<String>,
        file: &str,
        path: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self::new(code, Severity::Error, message, file, path)
    }

    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self::new(code, Severity::Warning, message, file, path)
    }

    pub fn info(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self::new(code, Severity::Info, message, file, path)
    }

    /// Attach a fix hint
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Re-home the entry onto another file (schema errors are produced file-less)
    pub fn with_file(mut self, file: &str) -> Self {
        self.file = file.to_string();
        self
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({} {})", self.code, self.message, self.file, self.path)
    }
}

/// Aggregated diagnostics for one layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False as soon as any entry has error severity
    pub ok: bool,
    pub errors: Vec<ErrorEntry>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationReport {
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let ok = !errors.iter().any(|e| e.severity == Severity::Error);
        Self { ok, errors }
    }

    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.ok
    }

    /// Entries carrying the given code, in report order
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ErrorEntry> + 'a {
        self.errors.iter().filter(move |e| e.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_entry_json_shape() {
        let entry = ErrorEntry::warning(
            W_DUPLICATE_NAME,
            "Widget name 'Cutoff' is used 2 times",
            "layout.json",
            "$.widgets[1].name",
        )
        .with_suggestion("Rename one of the widgets");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["code"], "W_DUPLICATE_NAME");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["file"], "layout.json");
        assert_eq!(json["path"], "$.widgets[1].name");
        assert_eq!(json["suggestion"], "Rename one of the widgets");
    }

    #[test]
    fn test_entry_without_suggestion_skips_in_json() {
        let entry = ErrorEntry::error(E_PARSE_ERROR, "bad", "layout.json", "$");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_warnings_keep_report_ok() {
        let report = ValidationReport::from_errors(vec![ErrorEntry::warning(
            W_ZERO_SIZE,
            "zero",
            "layout.json",
            "$",
        )]);
        assert!(report.ok);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_push_error_flips_ok() {
        let mut report = ValidationReport::success();
        report.push(ErrorEntry::info("I_NOTE", "fyi", "layout.json", "$"));
        assert!(report.ok);
        report.push(ErrorEntry::error(
            E_MISSING_PLUGIN_NAME,
            "missing",
            "layout.json",
            "$.plugin.name",
        ));
        assert!(report.has_errors());
    }

    #[test]
    fn test_merge_and_filter_by_code() {
        let mut a = ValidationReport::success();
        let mut b = ValidationReport::success();
        b.push(ErrorEntry::warning(W_MIDI_CC_RANGE, "cc", "layout.json", "$"));
        b.push(ErrorEntry::warning(W_ZERO_SIZE, "size", "layout.json", "$"));
        a.merge(b);
        assert!(a.ok);
        assert_eq!(a.with_code(W_MIDI_CC_RANGE).count(), 1);
    }

    #[test]
    fn test_with_file_rewrites_location() {
        let entry = ErrorEntry::error(E_SCHEMA_VIOLATION, "bad", "", "$").with_file("a.json");
        assert_eq!(entry.file, "a.json");
        assert_eq!(entry.to_string(), "[E_SCHEMA_VIOLATION] bad (a.json $)");
    }
}
