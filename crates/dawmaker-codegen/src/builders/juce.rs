use dawmaker_model::{Framework, PluginFormat};

use crate::builders::lv2_uri;
use crate::naming::cmake_string;
use crate::plan::PluginIdentity;
use crate::traits::BuildEmitter;

/// JUCE CMake project built around `juce_add_plugin`.
pub struct JuceBuilder;

fn juce_format(format: PluginFormat) -> &'static str {
    match format {
        PluginFormat::Vst3 => "VST3",
        PluginFormat::Au => "AU",
        PluginFormat::Aax => "AAX",
        PluginFormat::Lv2 => "LV2",
        PluginFormat::Standalone => "Standalone",
    }
}

impl BuildEmitter for JuceBuilder {
    fn framework(&self) -> Framework {
        Framework::Juce
    }

    fn emit_build_files(&self, identity: &PluginIdentity) -> Vec<(String, String)> {
        let target = &identity.class_name;
        let formats: Vec<&str> = identity.formats.iter().map(|f| juce_format(*f)).collect();
        let lv2 = if identity.wants(PluginFormat::Lv2) {
            format!("    LV2URI {}\n", cmake_string(&lv2_uri(identity)))
        } else {
            String::new()
        };

        let cmake = format!(
            r#"cmake_minimum_required(VERSION 3.22)

project({target} VERSION {version})

set(JUCE_DIR "${{CMAKE_CURRENT_SOURCE_DIR}}/JUCE" CACHE PATH "Path to a JUCE checkout")
add_subdirectory(${{JUCE_DIR}} JUCE)

juce_add_plugin({target}
    VERSION {version}
    COMPANY_NAME {company}
    BUNDLE_ID {bundle}
    IS_SYNTH FALSE
    NEEDS_MIDI_INPUT TRUE
    NEEDS_MIDI_OUTPUT FALSE
    IS_MIDI_EFFECT FALSE
    EDITOR_WANTS_KEYBOARD_FOCUS FALSE
    COPY_PLUGIN_AFTER_BUILD FALSE
    PLUGIN_MANUFACTURER_CODE {manufacturer_code}
    PLUGIN_CODE {plugin_code}
    FORMATS {formats}
{lv2}    PRODUCT_NAME {product})

juce_generate_juce_header({target})

target_sources({target}
    PRIVATE
        Source/PluginEditor.cpp
        Source/PluginProcessor.cpp)

target_compile_definitions({target}
    PUBLIC
        JUCE_WEB_BROWSER=0
        JUCE_USE_CURL=0
        JUCE_VST3_CAN_REPLACE_VST2=0)

target_link_libraries({target}
    PRIVATE
        juce::juce_audio_utils
    PUBLIC
        juce::juce_recommended_config_flags
        juce::juce_recommended_lto_flags
        juce::juce_recommended_warning_flags)
"#,
            version = identity.version_triple(),
            company = cmake_string(&identity.manufacturer),
            bundle = identity.bundle_id,
            manufacturer_code = identity.manufacturer_code,
            plugin_code = identity.plugin_code,
            formats = formats.join(" "),
            product = cmake_string(&identity.display_name),
        );

        vec![("CMakeLists.txt".to_string(), cmake)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::ProjectMeta;

    fn cmake(meta: &ProjectMeta) -> String {
        let identity = PluginIdentity::from_meta(meta).unwrap();
        let mut files = JuceBuilder.emit_build_files(&identity);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "CMakeLists.txt");
        files.remove(0).1
    }

    #[test]
    fn test_plugin_metadata() {
        let cmake = cmake(&ProjectMeta::new("MyPlugin", "Acme", Framework::Juce));
        assert!(cmake.contains("juce_add_plugin(MyPlugin\n"));
        assert!(cmake.contains("    COMPANY_NAME \"Acme\"\n"));
        assert!(cmake.contains("    PLUGIN_MANUFACTURER_CODE Acme\n"));
        assert!(cmake.contains("    PLUGIN_CODE Mypl\n"));
        assert!(cmake.contains("    FORMATS VST3 AU Standalone\n"));
        assert!(cmake.contains("    PRODUCT_NAME \"MyPlugin\")"));
        assert!(cmake.contains("project(MyPlugin VERSION 1.0.0)"));
        assert!(!cmake.contains("LV2URI"));
    }

    #[test]
    fn test_lv2_uri_only_with_lv2() {
        let meta = ProjectMeta::new("Grit", "Acme", Framework::Juce)
            .with_formats(vec![PluginFormat::Lv2, PluginFormat::Vst3]);
        let cmake = cmake(&meta);
        assert!(cmake.contains("    FORMATS LV2 VST3\n"));
        assert!(cmake.contains("    LV2URI \"urn:acme:grit\"\n"));
    }
}
