use dawmaker_model::Framework;

use crate::naming::cmake_string;
use crate::plan::PluginIdentity;
use crate::traits::BuildEmitter;

/// Elements application CMake project.
pub struct ElementsBuilder;

impl BuildEmitter for ElementsBuilder {
    fn framework(&self) -> Framework {
        Framework::Elements
    }

    fn emit_build_files(&self, identity: &PluginIdentity) -> Vec<(String, String)> {
        let cmake = format!(
            r#"cmake_minimum_required(VERSION 3.16.3)

project({class} LANGUAGES C CXX VERSION {version})

set(ELEMENTS_ROOT "${{CMAKE_CURRENT_SOURCE_DIR}}/elements" CACHE PATH "Path to the elements library")
set(CMAKE_MODULE_PATH ${{CMAKE_MODULE_PATH}} "${{ELEMENTS_ROOT}}/cmake")
include(ElementsConfigCommon)

set(ELEMENTS_BUILD_EXAMPLES OFF)
add_subdirectory(${{ELEMENTS_ROOT}} elements)

set(ELEMENTS_APP_PROJECT "{class}")
set(ELEMENTS_APP_TITLE {title})
set(ELEMENTS_APP_COPYRIGHT {copyright})
set(ELEMENTS_APP_ID "{bundle}")
set(ELEMENTS_APP_VERSION "{version}")
set(ELEMENTS_APP_SOURCES ${{CMAKE_CURRENT_SOURCE_DIR}}/src/main.cpp)

include(ElementsAppCommon)
"#,
            class = identity.class_name,
            version = identity.version_triple(),
            title = cmake_string(&identity.display_name),
            copyright = cmake_string(&format!("Copyright (c) {}", identity.manufacturer)),
            bundle = identity.bundle_id,
        );
        vec![("CMakeLists.txt".to_string(), cmake)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::ProjectMeta;

    #[test]
    fn test_app_template_variables() {
        let meta = ProjectMeta::new("Space Echo", "Acme", Framework::Elements);
        let identity = PluginIdentity::from_meta(&meta).unwrap();
        let files = ElementsBuilder.emit_build_files(&identity);
        assert_eq!(files.len(), 1);
        let cmake = &files[0].1;
        assert!(cmake.contains("set(ELEMENTS_APP_PROJECT \"SpaceEcho\")"));
        assert!(cmake.contains("set(ELEMENTS_APP_TITLE \"Space Echo\")"));
        assert!(cmake.contains("set(ELEMENTS_APP_ID \"com.acme.spaceecho\")"));
        assert!(cmake.contains("include(ElementsAppCommon)"));
    }
}
