use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Target plugin frameworks
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Juce,
    Iplug2,
    Dpf,
    Elements,
}

impl Framework {
    pub const ALL: [Framework; 4] = [
        Framework::Juce,
        Framework::Iplug2,
        Framework::Dpf,
        Framework::Elements,
    ];

    /// Stable lowercase key, identical to the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Framework::Juce => "juce",
            Framework::Iplug2 => "iplug2",
            Framework::Dpf => "dpf",
            Framework::Elements => "elements",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Framework::Juce => "JUCE",
            Framework::Iplug2 => "iPlug2",
            Framework::Dpf => "DPF",
            Framework::Elements => "Elements",
        }
    }

    /// Packaging formats the framework's build tooling can produce
    pub fn supported_formats(self) -> &'static [PluginFormat] {
        use PluginFormat::*;
        match self {
            Framework::Juce => &[Vst3, Au, Aax, Lv2, Standalone],
            Framework::Iplug2 => &[Vst3, Au, Aax, Standalone],
            Framework::Dpf => &[Vst3, Au, Lv2, Standalone],
            Framework::Elements => &[Standalone],
        }
    }

    /// Formats used when a project does not request any
    pub fn default_formats(self) -> &'static [PluginFormat] {
        use PluginFormat::*;
        match self {
            Framework::Juce | Framework::Iplug2 => &[Vst3, Au, Standalone],
            Framework::Dpf => &[Lv2, Vst3, Standalone],
            Framework::Elements => &[Standalone],
        }
    }

    pub fn supports(self, format: PluginFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "juce" => Ok(Framework::Juce),
            "iplug2" | "iplug" => Ok(Framework::Iplug2),
            "dpf" => Ok(Framework::Dpf),
            "elements" => Ok(Framework::Elements),
            other => Err(format!(
                "unknown framework '{other}', expected one of: juce, iplug2, dpf, elements"
            )),
        }
    }
}

/// Plugin packaging formats
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PluginFormat {
    Vst3,
    Au,
    Aax,
    Lv2,
    Standalone,
}

impl PluginFormat {
    pub const ALL: [PluginFormat; 5] = [
        PluginFormat::Vst3,
        PluginFormat::Au,
        PluginFormat::Aax,
        PluginFormat::Lv2,
        PluginFormat::Standalone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PluginFormat::Vst3 => "vst3",
            PluginFormat::Au => "au",
            PluginFormat::Aax => "aax",
            PluginFormat::Lv2 => "lv2",
            PluginFormat::Standalone => "standalone",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PluginFormat::Vst3 => "VST3",
            PluginFormat::Au => "AU",
            PluginFormat::Aax => "AAX",
            PluginFormat::Lv2 => "LV2",
            PluginFormat::Standalone => "Standalone",
        }
    }
}

impl fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PluginFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vst3" => Ok(PluginFormat::Vst3),
            "au" | "auv2" => Ok(PluginFormat::Au),
            "aax" => Ok(PluginFormat::Aax),
            "lv2" => Ok(PluginFormat::Lv2),
            "standalone" | "app" => Ok(PluginFormat::Standalone),
            other => Err(format!(
                "unknown plugin format '{other}', expected one of: vst3, au, aax, lv2, standalone"
            )),
        }
    }
}

/// Error/warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_serialization() {
        assert_eq!(serde_json::to_value(Framework::Juce).unwrap(), "juce");
        assert_eq!(serde_json::to_value(Framework::Iplug2).unwrap(), "iplug2");
        assert_eq!(serde_json::to_value(Framework::Dpf).unwrap(), "dpf");
        assert_eq!(
            serde_json::to_value(Framework::Elements).unwrap(),
            "elements"
        );
        for fw in Framework::ALL {
            assert_eq!(serde_json::to_value(fw).unwrap(), fw.as_str());
        }
    }

    #[test]
    fn test_framework_from_str() {
        assert_eq!("JUCE".parse::<Framework>().unwrap(), Framework::Juce);
        assert_eq!("iplug".parse::<Framework>().unwrap(), Framework::Iplug2);
        assert!("qt".parse::<Framework>().is_err());
    }

    #[test]
    fn test_default_formats_are_supported() {
        for fw in Framework::ALL {
            for format in fw.default_formats() {
                assert!(fw.supports(*format), "{fw} default {format} unsupported");
            }
        }
    }

    #[test]
    fn test_elements_is_standalone_only() {
        assert_eq!(
            Framework::Elements.supported_formats(),
            &[PluginFormat::Standalone]
        );
        assert!(!Framework::Iplug2.supports(PluginFormat::Lv2));
        assert!(!Framework::Dpf.supports(PluginFormat::Aax));
    }

    #[test]
    fn test_plugin_format_from_str() {
        assert_eq!("VST3".parse::<PluginFormat>().unwrap(), PluginFormat::Vst3);
        assert_eq!("app".parse::<PluginFormat>().unwrap(), PluginFormat::Standalone);
        assert!("rtas".parse::<PluginFormat>().is_err());
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Error).unwrap(), "error");
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
        assert_eq!(serde_json::to_value(Severity::Info).unwrap(), "info");
    }
}
