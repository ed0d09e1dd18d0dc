pub mod dpf;
pub mod elements;
pub mod iplug2;
pub mod juce;

use dawmaker_model::Framework;

use crate::naming::slug;
use crate::plan::PluginIdentity;
use crate::traits::BuildEmitter;

/// Create the build-file emitter for the given framework.
pub fn create_builder(framework: Framework) -> Box<dyn BuildEmitter> {
    match framework {
        Framework::Juce => Box::new(juce::JuceBuilder),
        Framework::Iplug2 => Box::new(iplug2::Iplug2Builder),
        Framework::Dpf => Box::new(dpf::DpfBuilder),
        Framework::Elements => Box::new(elements::ElementsBuilder),
    }
}

/// LV2 plugin URI: `urn:acme:myplugin`.
pub(crate) fn lv2_uri(identity: &PluginIdentity) -> String {
    let vendor = slug(&identity.manufacturer);
    let product = slug(&identity.display_name);
    format!(
        "urn:{}:{}",
        if vendor.is_empty() { "dawmaker" } else { vendor.as_str() },
        if product.is_empty() { "plugin" } else { product.as_str() }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::ProjectMeta;

    #[test]
    fn test_create_builder_matches_framework() {
        for framework in Framework::ALL {
            assert_eq!(create_builder(framework).framework(), framework);
        }
    }

    #[test]
    fn test_lv2_uri() {
        let meta = ProjectMeta::new("Space Echo", "Acme Audio", Framework::Dpf);
        let identity = PluginIdentity::from_meta(&meta).unwrap();
        assert_eq!(lv2_uri(&identity), "urn:acmeaudio:spaceecho");

        let meta = ProjectMeta::new("Echo", "", Framework::Dpf);
        let identity = PluginIdentity::from_meta(&meta).unwrap();
        assert_eq!(lv2_uri(&identity), "urn:dawmaker:echo");
    }
}
