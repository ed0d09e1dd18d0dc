use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{Framework, PluginFormat};
use super::widget::WidgetDescriptor;

pub const FORMAT_VERSION: u32 = 1;
pub const DEFAULT_MANUFACTURER: &str = "CustomManufacturer";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Plugin-level metadata for one export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub name: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default)]
    pub framework: Framework,
    /// Requested packaging formats; empty means the framework defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<PluginFormat>,
    /// Semver plugin version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ProjectMeta {
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        framework: Framework,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            framework,
            formats: Vec::new(),
            version: default_version(),
        }
    }

    pub fn with_formats(mut self, formats: impl IntoIterator<Item = PluginFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    /// Requested formats the framework cannot build, first-seen order
    pub fn unsupported_formats(&self) -> Vec<PluginFormat> {
        let mut dropped = Vec::new();
        for format in &self.formats {
            if !self.framework.supports(*format) && !dropped.contains(format) {
                dropped.push(*format);
            }
        }
        dropped
    }

    /// Requested formats, de-duplicated and filtered to what the framework supports.
    /// Falls back to the framework defaults when nothing usable remains.
    pub fn effective_formats(&self) -> Vec<PluginFormat> {
        let mut formats: Vec<PluginFormat> = Vec::new();
        for format in &self.formats {
            if self.framework.supports(*format) && !formats.contains(format) {
                formats.push(*format);
            }
        }
        if formats.is_empty() {
            formats = self.framework.default_formats().to_vec();
        }
        formats
    }

    pub fn parsed_version(&self) -> Option<semver::Version> {
        semver::Version::parse(self.version.trim()).ok()
    }
}

/// Persisted layout: plugin metadata plus the ordered widget snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub plugin: ProjectMeta,
    #[serde(default)]
    pub widgets: Vec<WidgetDescriptor>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl LayoutDocument {
    pub fn new(plugin: ProjectMeta) -> Self {
        Self {
            schema: None,
            format_version: FORMAT_VERSION,
            plugin,
            widgets: Vec::new(),
        }
    }

    pub fn with_widgets(mut self, widgets: impl IntoIterator<Item = WidgetDescriptor>) -> Self {
        self.widgets.extend(widgets);
        self
    }

    pub fn push(&mut self, widget: WidgetDescriptor) {
        self.widgets.push(widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::widget::{Bounds, WidgetKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meta_defaults() {
        let meta: ProjectMeta = serde_json::from_str(r#"{"name": "MyPlugin"}"#).unwrap();
        assert_eq!(meta.manufacturer, "CustomManufacturer");
        assert_eq!(meta.framework, Framework::Juce);
        assert_eq!(meta.version, "1.0.0");
        assert!(meta.formats.is_empty());
    }

    #[test]
    fn test_effective_formats_filters_and_dedupes() {
        let meta = ProjectMeta::new("P", "Acme", Framework::Iplug2).with_formats([
            PluginFormat::Lv2,
            PluginFormat::Vst3,
            PluginFormat::Vst3,
            PluginFormat::Aax,
        ]);
        assert_eq!(
            meta.effective_formats(),
            vec![PluginFormat::Vst3, PluginFormat::Aax]
        );
        assert_eq!(meta.unsupported_formats(), vec![PluginFormat::Lv2]);
    }

    #[test]
    fn test_effective_formats_falls_back_to_defaults() {
        let meta = ProjectMeta::new("P", "Acme", Framework::Elements)
            .with_formats([PluginFormat::Vst3]);
        assert_eq!(meta.effective_formats(), vec![PluginFormat::Standalone]);

        let meta = ProjectMeta::new("P", "Acme", Framework::Dpf);
        assert_eq!(
            meta.effective_formats(),
            Framework::Dpf.default_formats().to_vec()
        );
    }

    #[test]
    fn test_parsed_version() {
        let mut meta = ProjectMeta::new("P", "Acme", Framework::Juce);
        assert_eq!(meta.parsed_version(), Some(semver::Version::new(1, 0, 0)));
        meta.version = "one".into();
        assert_eq!(meta.parsed_version(), None);
    }

    #[test]
    fn test_layout_round_trip() {
        let doc = LayoutDocument::new(ProjectMeta::new("MyPlugin", "Acme", Framework::Dpf))
            .with_widgets([WidgetDescriptor::new(
                WidgetKind::Knob,
                "Cutoff",
                Bounds::new(10, 10, 120, 120),
            )]);
        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"formatVersion\": 1"));
        assert!(!json.contains("$schema"));
        let back: LayoutDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
