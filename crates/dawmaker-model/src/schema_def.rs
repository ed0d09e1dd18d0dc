use jsonschema::Validator;
use schemars::schema_for;

use crate::types::error::{ErrorEntry, E_SCHEMA_VIOLATION};
use crate::types::project::LayoutDocument;

/// JSON Schema for `LayoutDocument`, derived from the Rust types.
pub fn generate_layout_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(LayoutDocument)).expect("schema serialization should not fail")
}

/// Validate a JSON value against a JSON Schema, one entry per violation.
pub fn validate_against_schema(
    value: &serde_json::Value,
    schema: &serde_json::Value,
) -> Vec<ErrorEntry> {
    let compiled = match Validator::new(schema) {
        Ok(v) => v,
        Err(e) => {
            return vec![ErrorEntry::error(
                E_SCHEMA_VIOLATION,
                format!("Invalid schema: {e}"),
                "",
                "$",
            )];
        }
    };

    compiled
        .iter_errors(value)
        .map(|err| {
            let instance_path = err.instance_path.as_str();
            let path = if instance_path.is_empty() {
                "$".to_string()
            } else {
                format!("${instance_path}")
            };
            ErrorEntry::error(E_SCHEMA_VIOLATION, err.to_string(), "", &path)
        })
        .collect()
}

/// Validate a raw layout value against the generated layout schema
pub fn validate_layout_value(value: &serde_json::Value, file_path: &str) -> Vec<ErrorEntry> {
    let schema = generate_layout_schema();
    validate_against_schema(value, &schema)
        .into_iter()
        .map(|entry| entry.with_file(file_path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_layout_json() -> serde_json::Value {
        serde_json::json!({
            "formatVersion": 1,
            "plugin": { "name": "MyPlugin", "manufacturer": "Acme", "framework": "juce", "formats": ["vst3", "au"] },
            "widgets": [
                {
                    "kind": "knob",
                    "name": "Cutoff",
                    "bounds": { "x": 10, "y": 10, "width": 120, "height": 120 },
                    "style": { "knobColor": "#ff8800", "knobStyle": 4 },
                    "midiBinding": { "cc": 74, "channel": 1 }
                },
                {
                    "kind": { "indexed_slider": { "options": ["Sine", "Saw"] } },
                    "name": "Wave",
                    "bounds": { "x": 0, "y": 140, "width": 200, "height": 40 }
                }
            ]
        })
    }

    #[test]
    fn generated_schema_is_an_object_schema() {
        let schema = generate_layout_schema();
        assert!(schema.is_object());
        assert_eq!(schema["title"], "LayoutDocument");
        assert!(schema["properties"].get("widgets").is_some());
    }

    #[test]
    fn valid_layout_passes_validation() {
        let errors = validate_layout_value(&valid_layout_json(), "layout.json");
        assert!(errors.is_empty(), "Expected no errors, got: {errors:?}");
    }

    #[test]
    fn missing_plugin_is_reported() {
        let errors = validate_layout_value(&serde_json::json!({ "widgets": [] }), "layout.json");
        assert!(!errors.is_empty());
        for err in &errors {
            assert_eq!(err.code, E_SCHEMA_VIOLATION);
            assert_eq!(err.file, "layout.json");
        }
    }

    #[test]
    fn wrong_framework_and_color_are_reported_with_paths() {
        let mut value = valid_layout_json();
        value["plugin"]["framework"] = serde_json::json!("wwise");
        value["widgets"][0]["style"]["knobColor"] = serde_json::json!("orange");

        let errors = validate_layout_value(&value, "layout.json");
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"$/plugin/framework"), "{paths:?}");
        assert!(
            paths.contains(&"$/widgets/0/style/knobColor"),
            "{paths:?}"
        );
    }

    #[test]
    fn negative_width_is_reported() {
        let mut value = valid_layout_json();
        value["widgets"][0]["bounds"]["width"] = serde_json::json!(-4);
        let errors = validate_layout_value(&value, "layout.json");
        assert!(!errors.is_empty());
    }
}
