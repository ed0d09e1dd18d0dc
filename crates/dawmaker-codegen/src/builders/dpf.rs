use dawmaker_model::{Framework, PluginFormat};

use crate::builders::lv2_uri;
use crate::naming::cpp_string_literal;
use crate::plan::PluginIdentity;
use crate::traits::BuildEmitter;

/// DPF `Makefile` and `DistrhoPluginInfo.h`.
pub struct DpfBuilder;

fn dpf_target(format: PluginFormat) -> &'static str {
    match format {
        PluginFormat::Lv2 => "lv2_sep",
        PluginFormat::Vst3 => "vst3",
        PluginFormat::Au => "au",
        PluginFormat::Standalone => "jack",
        // Not buildable with DPF; never in the identity's formats
        PluginFormat::Aax => "",
    }
}

impl DpfBuilder {
    fn makefile(&self, identity: &PluginIdentity) -> String {
        let class = &identity.class_name;
        let targets: Vec<&str> = identity
            .formats
            .iter()
            .map(|f| dpf_target(*f))
            .filter(|t| !t.is_empty())
            .collect();

        format!(
            "#!/usr/bin/make -f
# Makefile for {display} #

DPF_PATH ?= dpf

NAME = {class}

FILES_DSP = \\
\t{class}Plugin.cpp

FILES_UI = \\
\t{class}UI.cpp

UI_TYPE = opengl

include $(DPF_PATH)/Makefile.plugins.mk

TARGETS += {targets}

all: $(TARGETS)

check-dpf:
\t@test -f $(DPF_PATH)/Makefile.plugins.mk || (echo \"DPF not found at $(DPF_PATH)\" && false)

.PHONY: check-dpf
",
            display = identity.display_name.replace('#', ""),
            targets = targets.join(" "),
        )
    }

    fn plugin_info(&self, identity: &PluginIdentity) -> String {
        format!(
            r#"#ifndef DISTRHO_PLUGIN_INFO_H_INCLUDED
#define DISTRHO_PLUGIN_INFO_H_INCLUDED

#define DISTRHO_PLUGIN_BRAND {brand}
#define DISTRHO_PLUGIN_NAME {name}
#define DISTRHO_PLUGIN_URI {uri}
#define DISTRHO_PLUGIN_CLAP_ID {clap_id}

#define DISTRHO_PLUGIN_BRAND_ID {brand_id}
#define DISTRHO_PLUGIN_UNIQUE_ID {unique_id}

#define DISTRHO_PLUGIN_HAS_UI 1
#define DISTRHO_PLUGIN_IS_RT_SAFE 1
#define DISTRHO_PLUGIN_NUM_INPUTS 2
#define DISTRHO_PLUGIN_NUM_OUTPUTS 2
#define DISTRHO_PLUGIN_WANT_MIDI_INPUT 1
#define DISTRHO_UI_USE_NANOVG 1
#define DISTRHO_UI_USER_RESIZABLE 0

#endif // DISTRHO_PLUGIN_INFO_H_INCLUDED
"#,
            brand = cpp_string_literal(&identity.manufacturer),
            name = cpp_string_literal(&identity.display_name),
            uri = cpp_string_literal(&lv2_uri(identity)),
            clap_id = cpp_string_literal(&identity.bundle_id),
            brand_id = identity.manufacturer_code,
            unique_id = identity.plugin_code,
        )
    }
}

impl BuildEmitter for DpfBuilder {
    fn framework(&self) -> Framework {
        Framework::Dpf
    }

    fn emit_build_files(&self, identity: &PluginIdentity) -> Vec<(String, String)> {
        vec![
            ("Makefile".to_string(), self.makefile(identity)),
            ("DistrhoPluginInfo.h".to_string(), self.plugin_info(identity)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::ProjectMeta;

    #[test]
    fn test_makefile_uses_tab_recipes() {
        let meta = ProjectMeta::new("Grit", "Acme", Framework::Dpf);
        let identity = PluginIdentity::from_meta(&meta).unwrap();
        let files = DpfBuilder.emit_build_files(&identity);
        assert_eq!(files[0].0, "Makefile");
        let makefile = &files[0].1;
        assert!(makefile.contains("NAME = Grit\n"));
        assert!(makefile.contains("FILES_DSP = \\\n\tGritPlugin.cpp\n"));
        assert!(makefile.contains("FILES_UI = \\\n\tGritUI.cpp\n"));
        assert!(makefile.contains("TARGETS += lv2_sep vst3 jack\n"));
        assert!(makefile.contains("check-dpf:\n\t@test -f"));
    }

    #[test]
    fn test_plugin_info() {
        let meta = ProjectMeta::new("Grit", "Acme", Framework::Dpf);
        let identity = PluginIdentity::from_meta(&meta).unwrap();
        let files = DpfBuilder.emit_build_files(&identity);
        assert_eq!(files[1].0, "DistrhoPluginInfo.h");
        let info = &files[1].1;
        assert!(info.contains("#define DISTRHO_PLUGIN_NAME \"Grit\"\n"));
        assert!(info.contains("#define DISTRHO_PLUGIN_URI \"urn:acme:grit\"\n"));
        assert!(info.contains("#define DISTRHO_PLUGIN_UNIQUE_ID Grit\n"));
        assert!(info.contains("#define DISTRHO_UI_USE_NANOVG 1\n"));
    }
}
