pub mod context;
pub mod error;
pub mod export;
pub mod generator;
pub mod naming;
pub mod plan;
pub mod traits;

// Per-framework source emitters
pub mod emitters;

// Per-framework build-file emitters
pub mod builders;

// Re-exports
pub use context::{EmitContext, IndentStyle};
pub use error::CodegenError;
pub use export::{export_project, ExportError, ExportReport, Exporter};
pub use generator::{generate, generate_build_files, CodeGenerator, GeneratedProject, WriteFailure};
pub use plan::{ExportPlan, ParamKind, PlannedParameter, PlannedWidget, PluginIdentity};
pub use traits::{BuildEmitter, SourceEmitter};
