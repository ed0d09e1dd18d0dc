use std::collections::HashMap;

use crate::identifier::is_valid_identifier;
use crate::types::error::*;
use crate::types::project::{LayoutDocument, FORMAT_VERSION};
use crate::types::widget::{ControlRole, WidgetDescriptor, WidgetKind};

/// Lint a layout. Errors block export; warnings describe what the
/// generators will rewrite, clamp or ignore.
pub fn check(doc: &LayoutDocument, file: &str) -> ValidationReport {
    let mut report = ValidationReport::success();
    check_plugin(doc, file, &mut report);

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, widget) in doc.widgets.iter().enumerate() {
        let path = format!("$.widgets[{index}]");
        let count = seen.entry(widget.name.as_str()).or_insert(0);
        *count += 1;
        if *count > 1 {
            report.push(
                ErrorEntry::warning(
                    W_DUPLICATE_NAME,
                    format!(
                        "Widget name '{}' is already used by an earlier widget",
                        widget.name
                    ),
                    file,
                    &format!("{path}.name"),
                )
                .with_suggestion("Generated code will append a numeric suffix; rename to control it"),
            );
        }
        check_widget(widget, file, &path, &mut report);
    }

    report
}

fn check_plugin(doc: &LayoutDocument, file: &str, report: &mut ValidationReport) {
    if doc.format_version != FORMAT_VERSION {
        report.push(ErrorEntry::error(
            E_FORMAT_VERSION,
            format!(
                "Unsupported layout format version {} (expected {FORMAT_VERSION})",
                doc.format_version
            ),
            file,
            "$.formatVersion",
        ));
    }

    let plugin = &doc.plugin;
    if plugin.name.trim().is_empty() {
        report.push(
            ErrorEntry::error(
                E_MISSING_PLUGIN_NAME,
                "Plugin name is empty",
                file,
                "$.plugin.name",
            )
            .with_suggestion("Set plugin.name, e.g. \"MyPlugin\""),
        );
    }

    if plugin.parsed_version().is_none() {
        report.push(
            ErrorEntry::warning(
                W_INVALID_VERSION,
                format!("'{}' is not a semantic version; 1.0.0 will be used", plugin.version),
                file,
                "$.plugin.version",
            )
            .with_suggestion("Use MAJOR.MINOR.PATCH, e.g. \"1.2.0\""),
        );
    }

    for format in plugin.unsupported_formats() {
        report.push(ErrorEntry::warning(
            W_UNSUPPORTED_FORMAT,
            format!(
                "{} cannot build {format}; the format will be dropped",
                plugin.framework
            ),
            file,
            "$.plugin.formats",
        ));
    }
}

fn check_widget(widget: &WidgetDescriptor, file: &str, path: &str, report: &mut ValidationReport) {
    if !is_valid_identifier(&widget.name) {
        report.push(ErrorEntry::warning(
            W_IDENTIFIER_REWRITTEN,
            format!(
                "'{}' is not a valid C++ identifier and will be sanitized",
                widget.name
            ),
            file,
            &format!("{path}.name"),
        ));
    }

    if widget.bounds.is_empty() {
        report.push(ErrorEntry::warning(
            W_ZERO_SIZE,
            format!("Widget '{}' has zero width or height", widget.name),
            file,
            &format!("{path}.bounds"),
        ));
    }

    if let WidgetKind::IndexedSlider { options } = &widget.kind {
        if options.is_empty() {
            report.push(ErrorEntry::warning(
                W_EMPTY_OPTIONS,
                format!(
                    "Indexed slider '{}' has no options; a single 'Option 1' will be generated",
                    widget.name
                ),
                file,
                &format!("{path}.kind.indexed_slider.options"),
            ));
        }
    }

    let Some(binding) = widget.midi else {
        return;
    };
    let midi_path = format!("{path}.midiBinding");

    if widget.role() == ControlRole::Display {
        report.push(ErrorEntry::warning(
            W_MIDI_IGNORED,
            format!(
                "{} '{}' displays values only; its MIDI binding is ignored",
                widget.kind.display_name(),
                widget.name
            ),
            file,
            &midi_path,
        ));
        return;
    }

    if !binding.cc_in_range() {
        report.push(ErrorEntry::warning(
            W_MIDI_CC_RANGE,
            format!(
                "CC {} is outside 0..=127 and will be clamped to {}",
                binding.cc,
                binding.clamped_cc()
            ),
            file,
            &format!("{midi_path}.cc"),
        ));
    }
    if !binding.channel_in_range() {
        report.push(ErrorEntry::warning(
            W_MIDI_CHANNEL_RANGE,
            format!(
                "Channel {} is outside 1..=16 and will be clamped to {}",
                binding.channel,
                binding.clamped_channel()
            ),
            file,
            &format!("{midi_path}.channel"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::{Framework, PluginFormat, Severity};
    use crate::types::project::ProjectMeta;
    use crate::types::widget::{Bounds, WidgetDescriptor};
    use pretty_assertions::assert_eq;

    fn doc(widgets: Vec<WidgetDescriptor>) -> LayoutDocument {
        LayoutDocument::new(ProjectMeta::new("MyPlugin", "Acme", Framework::Juce))
            .with_widgets(widgets)
    }

    fn codes(report: &ValidationReport) -> Vec<&str> {
        report.errors.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_clean_layout_has_no_entries() {
        let report = check(
            &doc(vec![WidgetDescriptor::placed(WidgetKind::Knob, "Cutoff", 0, 0)]),
            "layout.json",
        );
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_plugin_name_is_an_error() {
        let mut layout = doc(vec![]);
        layout.plugin.name = "   ".into();
        let report = check(&layout, "layout.json");
        assert!(report.has_errors());
        assert_eq!(codes(&report), vec![E_MISSING_PLUGIN_NAME]);
    }

    #[test]
    fn test_format_version_mismatch() {
        let mut layout = doc(vec![]);
        layout.format_version = 2;
        let report = check(&layout, "layout.json");
        assert_eq!(codes(&report), vec![E_FORMAT_VERSION]);
    }

    #[test]
    fn test_plugin_warnings() {
        let mut layout = doc(vec![]);
        layout.plugin.version = "v1".into();
        layout.plugin.framework = Framework::Elements;
        layout.plugin.formats = vec![PluginFormat::Vst3, PluginFormat::Standalone];
        let report = check(&layout, "layout.json");
        assert!(report.ok);
        assert_eq!(codes(&report), vec![W_INVALID_VERSION, W_UNSUPPORTED_FORMAT]);
    }

    #[test]
    fn test_widget_warnings() {
        let report = check(
            &doc(vec![
                WidgetDescriptor::placed(WidgetKind::Knob, "Gain", 0, 0),
                WidgetDescriptor::placed(WidgetKind::Knob, "Gain", 0, 0),
                WidgetDescriptor::new(WidgetKind::Slider, "1 Bad Name!", Bounds::new(0, 0, 0, 10)),
                WidgetDescriptor::placed(WidgetKind::IndexedSlider { options: vec![] }, "Mode", 0, 0),
            ]),
            "layout.json",
        );
        assert!(report.ok);
        assert_eq!(report.count(Severity::Warning), 4);
        assert_eq!(
            codes(&report),
            vec![W_DUPLICATE_NAME, W_IDENTIFIER_REWRITTEN, W_ZERO_SIZE, W_EMPTY_OPTIONS]
        );
        assert_eq!(report.errors[0].path, "$.widgets[1].name");
    }

    #[test]
    fn test_midi_warnings() {
        let report = check(
            &doc(vec![
                WidgetDescriptor::placed(WidgetKind::Knob, "A", 0, 0).with_midi(300, 0),
                WidgetDescriptor::placed(WidgetKind::VuMeter, "B", 0, 0).with_midi(300, 0),
                WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "C", 0, 0).with_midi(1, 2),
            ]),
            "layout.json",
        );
        assert_eq!(
            codes(&report),
            vec![W_MIDI_CC_RANGE, W_MIDI_CHANNEL_RANGE, W_MIDI_IGNORED]
        );
        assert_eq!(report.errors[0].path, "$.widgets[0].midiBinding.cc");
    }
}
