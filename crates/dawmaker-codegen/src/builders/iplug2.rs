use dawmaker_model::{Framework, PluginFormat};

use crate::naming::{cmake_string, cpp_string_literal, slug};
use crate::plan::PluginIdentity;
use crate::traits::BuildEmitter;

/// iPlug2 `config.h` and CMake project.
pub struct Iplug2Builder;

/// Window size the host sees before the editor reports its own size.
const DEFAULT_WIDTH: u32 = 600;
const DEFAULT_HEIGHT: u32 = 400;

/// (target suffix, iPlug2 link library, configure kind, CMake add command)
fn target_spec(format: PluginFormat) -> (&'static str, &'static str, &'static str, &'static str) {
    match format {
        PluginFormat::Standalone => ("app", "iPlug2_APP", "app", "add_executable(${target} WIN32 MACOSX_BUNDLE)"),
        PluginFormat::Vst3 => ("vst3", "iPlug2_VST3", "vst3", "add_library(${target} MODULE)"),
        PluginFormat::Au => ("au", "iPlug2_AUv2", "auv2", "add_library(${target} MODULE)"),
        PluginFormat::Aax => ("aax", "iPlug2_AAX", "aax", "add_library(${target} MODULE)"),
        // Not buildable with iPlug2; never in the identity's formats
        PluginFormat::Lv2 => ("lv2", "", "", ""),
    }
}

impl Iplug2Builder {
    fn config_header(&self, identity: &PluginIdentity) -> String {
        let class = &identity.class_name;
        let version = &identity.version;
        let version_hex = (version.major.min(0xffff) << 16)
            | (version.minor.min(0xff) << 8)
            | version.patch.min(0xff);
        let domain = identity
            .bundle_id
            .split('.')
            .next()
            .unwrap_or("com")
            .to_string();
        let vendor = slug(&identity.manufacturer);

        format!(
            r#"#define PLUG_NAME {name}
#define PLUG_MFR {mfr}
#define PLUG_VERSION_HEX 0x{version_hex:08x}
#define PLUG_VERSION_STR "{triple}"
#define PLUG_UNIQUE_ID '{plugin_code}'
#define PLUG_MFR_ID '{manufacturer_code}'
#define PLUG_URL_STR ""
#define PLUG_EMAIL_STR ""
#define PLUG_COPYRIGHT_STR {copyright}
#define PLUG_CLASS_NAME {class}

#define BUNDLE_NAME "{class}"
#define BUNDLE_MFR "{bundle_mfr}"
#define BUNDLE_DOMAIN "{domain}"

#define SHARED_RESOURCES_SUBPATH "{class}"

#define PLUG_CHANNEL_IO "2-2"

#define PLUG_LATENCY 0
#define PLUG_TYPE 0
#define PLUG_DOES_MIDI_IN 1
#define PLUG_DOES_MIDI_OUT 1
#define PLUG_DOES_MPE 0
#define PLUG_DOES_STATE_CHUNKS 0
#define PLUG_HAS_UI 1
#define PLUG_WIDTH {DEFAULT_WIDTH}
#define PLUG_HEIGHT {DEFAULT_HEIGHT}
#define PLUG_FPS 60
#define PLUG_SHARED_RESOURCES 0
#define PLUG_HOST_RESIZE 0

#define AUV2_ENTRY {class}_Entry
#define AUV2_ENTRY_STR "{class}_Entry"
#define AUV2_FACTORY {class}_Factory
#define AUV2_VIEW_CLASS {class}_View
#define AUV2_VIEW_CLASS_STR "{class}_View"

#define AAX_TYPE_IDS '{aax_prefix}1', '{aax_prefix}2'
#define AAX_TYPE_IDS_AUDIOSUITE '{aax_prefix}3', '{aax_prefix}4'
#define AAX_PLUG_MFR_STR {mfr}
#define AAX_PLUG_NAME_STR {name}
#define AAX_PLUG_CATEGORY_STR "Effect"
#define AAX_DOES_AUDIOSUITE 0

#define VST3_SUBCATEGORY "Fx"

#define APP_NUM_CHANNELS 2
#define APP_N_VECTOR_WAIT 0
#define APP_MULT 1
#define APP_COPY_AUV3 0
#define APP_SIGNAL_VECTOR_SIZE 64

#define ROBOTO_FN "Roboto-Regular.ttf"
"#,
            name = cpp_string_literal(&identity.display_name),
            mfr = cpp_string_literal(&identity.manufacturer),
            triple = identity.version_triple(),
            plugin_code = identity.plugin_code,
            manufacturer_code = identity.manufacturer_code,
            copyright = cpp_string_literal(&format!("Copyright {}", identity.manufacturer)),
            bundle_mfr = if vendor.is_empty() { "dawmaker" } else { vendor.as_str() },
            aax_prefix = &identity.plugin_code[..3],
        )
    }

    fn cmake(&self, identity: &PluginIdentity) -> String {
        let class = &identity.class_name;
        let mut targets = String::new();
        for format in &identity.formats {
            let (suffix, library, kind, add) = target_spec(*format);
            if library.is_empty() {
                continue;
            }
            targets.push_str(&format!(
                r#"
set(target ${{PLUG_NAME}}-{suffix})
{add}
iplug_target_add(${{target}} PUBLIC LINK {library} _base)
iplug_configure_target(${{target}} {kind})
"#
            ));
        }

        format!(
            r#"cmake_minimum_required(VERSION 3.14)

project({class} VERSION {version})

set(IPLUG2_DIR "${{CMAKE_CURRENT_SOURCE_DIR}}/iPlug2" CACHE PATH "Path to an iPlug2 checkout")
include(${{IPLUG2_DIR}}/iPlug2.cmake)
find_package(iPlug2 REQUIRED)

set(PLUG_NAME ${{PROJECT_NAME}})
set(PLUG_TITLE {title})
set(PLUG_RESOURCES_DIR ${{CMAKE_CURRENT_SOURCE_DIR}}/resources)

set(SOURCE_FILES
    config.h
    {class}.h
    {class}.cpp)

add_library(_base INTERFACE)
iplug_target_add(_base INTERFACE
    INCLUDE ${{PLUG_RESOURCES_DIR}} ${{PLUG_RESOURCES_DIR}}/fonts
    LINK iPlug2_NANOVG iPlug2_GL2)
iplug_target_add(_base INTERFACE SOURCE ${{SOURCE_FILES}})
{targets}"#,
            version = identity.version_triple(),
            title = cmake_string(&identity.display_name),
        )
    }
}

impl BuildEmitter for Iplug2Builder {
    fn framework(&self) -> Framework {
        Framework::Iplug2
    }

    fn emit_build_files(&self, identity: &PluginIdentity) -> Vec<(String, String)> {
        vec![
            ("config.h".to_string(), self.config_header(identity)),
            ("CMakeLists.txt".to_string(), self.cmake(identity)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::ProjectMeta;

    fn files(meta: &ProjectMeta) -> Vec<(String, String)> {
        let identity = PluginIdentity::from_meta(meta).unwrap();
        Iplug2Builder.emit_build_files(&identity)
    }

    #[test]
    fn test_config_header() {
        let mut meta = ProjectMeta::new("Tape Echo", "Acme", Framework::Iplug2);
        meta.version = "2.1.3".to_string();
        let files = files(&meta);
        assert_eq!(files[0].0, "config.h");
        let config = &files[0].1;
        assert!(config.contains("#define PLUG_NAME \"Tape Echo\"\n"));
        assert!(config.contains("#define PLUG_MFR \"Acme\"\n"));
        assert!(config.contains("#define PLUG_VERSION_HEX 0x00020103\n"));
        assert!(config.contains("#define PLUG_UNIQUE_ID 'Tape'\n"));
        assert!(config.contains("#define PLUG_MFR_ID 'Acme'\n"));
        assert!(config.contains("#define PLUG_CLASS_NAME TapeEcho\n"));
        assert!(config.contains("#define BUNDLE_MFR \"acme\"\n"));
        assert!(config.contains("#define ROBOTO_FN \"Roboto-Regular.ttf\"\n"));
    }

    #[test]
    fn test_cmake_targets_follow_formats() {
        let meta = ProjectMeta::new("Tape Echo", "Acme", Framework::Iplug2)
            .with_formats(vec![PluginFormat::Vst3, PluginFormat::Aax]);
        let files = files(&meta);
        assert_eq!(files[1].0, "CMakeLists.txt");
        let cmake = &files[1].1;
        assert!(cmake.contains("project(TapeEcho VERSION 1.0.0)"));
        assert!(cmake.contains("set(target ${PLUG_NAME}-vst3)"));
        assert!(cmake.contains("iplug_configure_target(${target} aax)"));
        assert!(!cmake.contains("-app)"));
    }
}
