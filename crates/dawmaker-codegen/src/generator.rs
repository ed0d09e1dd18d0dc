use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dawmaker_model::{Framework, ProjectMeta, WidgetDescriptor};
use log::debug;

use crate::builders;
use crate::emitters;
use crate::error::CodegenError;
use crate::plan::{ExportPlan, PluginIdentity};
use crate::traits::{BuildEmitter, SourceEmitter};

/// A collection of generated files, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedProject {
    /// Files keyed by relative path (sorted for deterministic output)
    files: BTreeMap<String, String>,
}

/// A write that stopped part way. Files listed in `written` stay on disk.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}", .failed.display())]
pub struct WriteFailure {
    pub written: Vec<PathBuf>,
    pub failed: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl GeneratedProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the generated project. Returns the previous content
    /// when the path was already present.
    pub fn add_file(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Option<String> {
        self.files.insert(path.into(), content.into())
    }

    /// Get all generated files.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Number of generated files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Write all generated files under `output_dir`, in path order.
    /// Stops at the first failure; nothing already written is removed.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<Vec<PathBuf>, WriteFailure> {
        let mut written = Vec::with_capacity(self.files.len());
        for (rel_path, content) in &self.files {
            let full_path = output_dir.join(rel_path);
            let result = match full_path.parent() {
                Some(parent) => std::fs::create_dir_all(parent),
                None => Ok(()),
            }
            .and_then(|()| std::fs::write(&full_path, content));

            if let Err(source) = result {
                return Err(WriteFailure {
                    written,
                    failed: full_path,
                    source,
                });
            }
            debug!("wrote {}", full_path.display());
            written.push(full_path);
        }
        Ok(written)
    }
}

/// The main code generator that combines a framework's source emitter
/// with its build-file emitter to produce a complete project.
pub struct CodeGenerator {
    emitter: Box<dyn SourceEmitter>,
    builder: Box<dyn BuildEmitter>,
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("framework", &self.emitter.framework())
            .finish()
    }
}

impl CodeGenerator {
    /// Create a new code generator for the given framework.
    pub fn new(framework: Framework) -> Self {
        Self {
            emitter: emitters::create_emitter(framework),
            builder: builders::create_builder(framework),
        }
    }

    pub fn framework(&self) -> Framework {
        self.emitter.framework()
    }

    /// Source files only.
    pub fn generate_sources(
        &self,
        widgets: &[WidgetDescriptor],
        meta: &ProjectMeta,
    ) -> Result<GeneratedProject, CodegenError> {
        let meta = self.retarget(meta);
        let plan = ExportPlan::build(widgets, &meta, self.emitter.naming_rules())?;
        debug!(
            "{} plan: {} widgets, {} parameters, editor {}x{}",
            self.framework(),
            plan.widgets.len(),
            plan.parameters.len(),
            plan.editor_width,
            plan.editor_height
        );

        let mut output = GeneratedProject::new();
        for (path, content) in self.emitter.emit_sources(&plan) {
            output.add_file(path, content);
        }
        Ok(output)
    }

    /// Build files only; independent of the widget list.
    pub fn generate_build_files(&self, meta: &ProjectMeta) -> Result<GeneratedProject, CodegenError> {
        let identity = PluginIdentity::from_meta(&self.retarget(meta))?;
        let mut output = GeneratedProject::new();
        for (path, content) in self.builder.emit_build_files(&identity) {
            output.add_file(path, content);
        }
        Ok(output)
    }

    /// Generate a complete project: sources plus build files.
    pub fn generate(
        &self,
        widgets: &[WidgetDescriptor],
        meta: &ProjectMeta,
    ) -> Result<GeneratedProject, CodegenError> {
        // 1. Generate sources
        let mut output = self.generate_sources(widgets, meta)?;

        // 2. Generate build files and merge
        for (path, content) in self.generate_build_files(meta)?.files {
            let previous = output.add_file(path.clone(), content);
            debug_assert!(previous.is_none(), "source and build file collide at {path}");
        }

        debug!("{} generated {} files", self.framework(), output.file_count());
        Ok(output)
    }

    /// Metadata with the framework forced to this generator's.
    fn retarget(&self, meta: &ProjectMeta) -> ProjectMeta {
        let mut meta = meta.clone();
        meta.framework = self.framework();
        meta
    }
}

/// Source files for `widgets` in `framework`, keyed by relative path.
pub fn generate(
    framework: Framework,
    widgets: &[WidgetDescriptor],
    plugin_name: &str,
    manufacturer: &str,
) -> Result<GeneratedProject, CodegenError> {
    let meta = ProjectMeta::new(plugin_name, manufacturer, framework);
    CodeGenerator::new(framework).generate_sources(widgets, &meta)
}

/// Build manifests for `framework`, keyed by relative path.
pub fn generate_build_files(
    framework: Framework,
    plugin_name: &str,
    manufacturer: &str,
) -> Result<GeneratedProject, CodegenError> {
    let meta = ProjectMeta::new(plugin_name, manufacturer, framework);
    CodeGenerator::new(framework).generate_build_files(&meta)
}
