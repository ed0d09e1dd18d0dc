use dawmaker_model::Framework;

use crate::context::{EmitContext, IndentStyle};
use crate::naming::NamingRules;
use crate::plan::{ExportPlan, PlannedWidget, PluginIdentity};

/// Framework-specific source emitter.
///
/// Each target framework implements this trait to turn the export plan
/// into the framework's source files. Per-widget methods dispatch on the
/// widget kind with an exhaustive `match`, so a new kind fails to compile
/// until every emitter handles it.
pub trait SourceEmitter {
    /// Which framework this emitter targets.
    fn framework(&self) -> Framework;

    /// Indentation used by the framework's own code base.
    fn indent_style(&self) -> IndentStyle;

    /// Names the generated code already occupies in widget scope, and the
    /// suffixes derived from every widget identifier.
    fn naming_rules(&self) -> NamingRules {
        NamingRules::default()
    }

    /// Member/field declaration for one widget.
    fn emit_declaration(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String;

    /// Construction code wiring geometry and style into the widget.
    fn emit_setup(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String;

    /// CC glue for the widget's binding. `None` when there is no binding.
    fn emit_midi_binding(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> Option<String>;

    /// Assemble every source file. Returns (relative_path, content) pairs.
    fn emit_sources(&self, plan: &ExportPlan<'_>) -> Vec<(String, String)>;

    /// Fresh context in this framework's indentation.
    fn new_context(&self) -> EmitContext {
        EmitContext::new(self.indent_style())
    }
}

/// Framework-specific build-file emitter. Independent of the widget list.
pub trait BuildEmitter {
    /// Which framework this emitter targets.
    fn framework(&self) -> Framework;

    /// Build manifests and configuration headers.
    /// Returns (relative_path, content) pairs.
    fn emit_build_files(&self, identity: &PluginIdentity) -> Vec<(String, String)>;
}

/// Comment line noting a binding that was dropped because the widget
/// only displays values.
pub(crate) fn ignored_binding_comment(widget: &PlannedWidget<'_>, prefix: &str) -> Option<String> {
    widget.midi_ignored.then(|| {
        format!(
            "{prefix} MIDI binding on display widget {} ignored",
            widget.ident
        )
    })
}
