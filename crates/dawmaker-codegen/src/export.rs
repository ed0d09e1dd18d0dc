use std::path::{Path, PathBuf};

use dawmaker_model::{Framework, ProjectMeta, WidgetDescriptor};
use log::{debug, error, info};
use thiserror::Error;

use crate::error::CodegenError;
use crate::generator::{CodeGenerator, WriteFailure};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory {} is not writable", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// Some files were written before the failure. They are left in place.
    #[error("export stopped at {} after writing {} files", .failed.display(), .written.len())]
    PartialWrite {
        written: Vec<PathBuf>,
        failed: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<WriteFailure> for ExportError {
    fn from(failure: WriteFailure) -> Self {
        ExportError::PartialWrite {
            written: failure.written,
            failed: failure.failed,
            source: failure.source,
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    /// Written files, in write order
    pub files: Vec<PathBuf>,
}

/// Runs one export for a framework: preflight, generate, write.
#[derive(Debug)]
pub struct Exporter {
    generator: CodeGenerator,
}

impl Exporter {
    pub fn new(framework: Framework) -> Self {
        Self {
            generator: CodeGenerator::new(framework),
        }
    }

    pub fn framework(&self) -> Framework {
        self.generator.framework()
    }

    pub fn export(
        &self,
        output_dir: &Path,
        widgets: &[WidgetDescriptor],
        meta: &ProjectMeta,
    ) -> Result<ExportReport, ExportError> {
        // 1. Make sure the directory can take files before generating anything
        ensure_writable(output_dir)?;

        // 2. Plan, generate and merge
        let project = self.generator.generate(widgets, meta)?;

        // 3. Write sequentially; no rollback on failure
        let files = project.write_to_disk(output_dir)?;

        Ok(ExportReport {
            output_dir: output_dir.to_path_buf(),
            files,
        })
    }
}

/// Prove `dir` can take new files, then create it.
///
/// The probe runs in the nearest existing ancestor, so a refused export
/// leaves no new directories behind.
fn ensure_writable(dir: &Path) -> Result<(), ExportError> {
    let not_writable = |source: std::io::Error| ExportError::NotWritable {
        path: dir.to_path_buf(),
        source,
    };

    let existing = dir
        .ancestors()
        .find(|p| p.exists())
        .unwrap_or_else(|| Path::new("."));
    if !existing.is_dir() {
        return Err(not_writable(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", existing.display()),
        )));
    }

    let probe = tempfile::Builder::new()
        .prefix(".dawmaker-probe")
        .tempfile_in(existing)
        .map_err(not_writable)?;
    debug!("probed {}", probe.path().display());
    probe.close().map_err(not_writable)?;

    std::fs::create_dir_all(dir).map_err(not_writable)
}

/// Export `widgets` as a `framework` project under `output_dir`.
/// Returns `true` only when every file was written. Failures are logged.
pub fn export_project(
    framework: Framework,
    output_dir: &Path,
    widgets: &[WidgetDescriptor],
    plugin_name: &str,
    manufacturer: &str,
) -> bool {
    let meta = ProjectMeta::new(plugin_name, manufacturer, framework);
    match Exporter::new(framework).export(output_dir, widgets, &meta) {
        Ok(report) => {
            info!(
                "exported {} files for {} to {}",
                report.files.len(),
                framework,
                report.output_dir.display()
            );
            true
        }
        Err(ExportError::PartialWrite { written, failed, source }) => {
            error!(
                "export to {} failed at {}: {} ({} files left in place)",
                output_dir.display(),
                failed.display(),
                source,
                written.len()
            );
            false
        }
        Err(e) => {
            error!("export to {} failed: {}", output_dir.display(), e);
            false
        }
    }
}
