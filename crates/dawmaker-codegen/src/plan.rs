use std::ops::Range;

use dawmaker_model::{
    ControlRole, Framework, PluginFormat, ProjectMeta, WidgetDescriptor, WidgetKind,
};

use crate::error::CodegenError;
use crate::naming::{self, IdentifierAllocator, NamingRules};

const EDITOR_MARGIN: i64 = 20;
const MIN_EDITOR_WIDTH: u32 = 400;
const MIN_EDITOR_HEIGHT: u32 = 300;

/// Everything the build files need to know about the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginIdentity {
    pub framework: Framework,
    /// Name shown to users, trimmed
    pub display_name: String,
    /// C++ class / target name
    pub class_name: String,
    pub manufacturer: String,
    pub plugin_code: String,
    pub manufacturer_code: String,
    pub bundle_id: String,
    pub version: semver::Version,
    pub formats: Vec<PluginFormat>,
}

impl PluginIdentity {
    pub fn from_meta(meta: &ProjectMeta) -> Result<Self, CodegenError> {
        let display_name = meta.name.trim().to_string();
        if display_name.is_empty() {
            return Err(CodegenError::MissingPluginName);
        }
        let manufacturer = meta.manufacturer.trim().to_string();

        let version = meta.parsed_version().unwrap_or_else(|| {
            log::warn!(
                "'{}' is not a semantic version, using 1.0.0",
                meta.version
            );
            semver::Version::new(1, 0, 0)
        });
        for format in meta.unsupported_formats() {
            log::warn!(
                "{} cannot build {format}, dropping it",
                meta.framework
            );
        }

        Ok(Self {
            framework: meta.framework,
            class_name: naming::class_name(&display_name),
            plugin_code: naming::four_char_code(&display_name, 'P'),
            manufacturer_code: naming::four_char_code(&manufacturer, 'M'),
            bundle_id: naming::bundle_id(&manufacturer, &display_name),
            formats: meta.effective_formats(),
            display_name,
            manufacturer,
            version,
        })
    }

    /// `major.minor.patch`, without pre-release or build metadata
    pub fn version_triple(&self) -> String {
        format!(
            "{}.{}.{}",
            self.version.major, self.version.minor, self.version.patch
        )
    }

    pub fn wants(&self, format: PluginFormat) -> bool {
        self.formats.contains(&format)
    }
}

/// Channel-filtered CC assignment after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiTarget {
    pub cc: u8,
    /// 1-based MIDI channel
    pub channel: u8,
}

/// Host parameter shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Continuous { min: f32, max: f32, default: f32 },
    Toggle { default: bool },
    Choice { options: Vec<String>, default: usize },
}

impl ParamKind {
    /// Default value mapped into 0..1
    pub fn default_normalized(&self) -> f32 {
        match self {
            ParamKind::Continuous { min, max, default } => {
                if max > min {
                    (default - min) / (max - min)
                } else {
                    0.0
                }
            }
            ParamKind::Toggle { default } => f32::from(u8::from(*default)),
            ParamKind::Choice { options, default } => {
                if options.len() > 1 {
                    *default as f32 / (options.len() - 1) as f32
                } else {
                    0.0
                }
            }
        }
    }

    /// Plain value range as `(min, max)`
    pub fn range(&self) -> (f32, f32) {
        match self {
            ParamKind::Continuous { min, max, .. } => (*min, *max),
            ParamKind::Toggle { .. } => (0.0, 1.0),
            ParamKind::Choice { options, .. } => (0.0, options.len().saturating_sub(1) as f32),
        }
    }
}

/// One host-visible parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedParameter {
    /// Position in the flat parameter list
    pub index: usize,
    /// Identifier-safe id (widget identifier plus axis suffix)
    pub id: String,
    /// User-facing name
    pub label: String,
    /// Position of the owning widget
    pub widget: usize,
    pub kind: ParamKind,
}

/// One widget, resolved for generation.
#[derive(Debug, Clone)]
pub struct PlannedWidget<'a> {
    pub descriptor: &'a WidgetDescriptor,
    /// Unique sanitized identifier
    pub ident: String,
    /// Position in the input list
    pub position: usize,
    /// Built-in style index, already wrapped into range
    pub style_index: usize,
    pub midi: Option<MidiTarget>,
    /// A binding was present but the kind has nothing to drive
    pub midi_ignored: bool,
    /// Slice of `ExportPlan::parameters` owned by this widget
    pub params: Range<usize>,
}

impl PlannedWidget<'_> {
    pub fn kind(&self) -> &WidgetKind {
        &self.descriptor.kind
    }

    pub fn role(&self) -> ControlRole {
        self.descriptor.kind.role()
    }

    /// Display name of the widget as entered in the editor
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// The exporter's IR: plugin identity plus every widget and parameter in
/// input order. Borrows the caller's widget snapshot and never mutates it.
#[derive(Debug, Clone)]
pub struct ExportPlan<'a> {
    pub identity: PluginIdentity,
    pub widgets: Vec<PlannedWidget<'a>>,
    pub parameters: Vec<PlannedParameter>,
    pub editor_width: u32,
    pub editor_height: u32,
}

impl<'a> ExportPlan<'a> {
    pub fn build(
        widgets: &'a [WidgetDescriptor],
        meta: &ProjectMeta,
        rules: NamingRules,
    ) -> Result<Self, CodegenError> {
        let identity = PluginIdentity::from_meta(meta)?;
        let class_names: Vec<String> = rules
            .class_suffixes
            .iter()
            .map(|suffix| format!("{}{suffix}", identity.class_name))
            .collect();
        let mut names = IdentifierAllocator::new(
            rules
                .reserved
                .iter()
                .copied()
                .chain(class_names.iter().map(String::as_str)),
        );
        let mut planned = Vec::with_capacity(widgets.len());
        let mut parameters = Vec::new();

        for (position, descriptor) in widgets.iter().enumerate() {
            let role = descriptor.kind.role();
            let mut companions: Vec<&str> = rules.companions.to_vec();
            if let ControlRole::TwoAxis { axes } = role {
                companions.extend(axes);
            }
            let ident = names.allocate(&descriptor.name, &companions);
            if ident != descriptor.name {
                log::debug!("widget '{}' -> identifier {ident}", descriptor.name);
            }

            let (midi, midi_ignored) = match descriptor.midi {
                Some(_) if !role.accepts_midi() => {
                    log::warn!(
                        "{} '{}' only displays values, ignoring its MIDI binding",
                        descriptor.kind.display_name(),
                        descriptor.name
                    );
                    (None, true)
                }
                Some(binding) => (
                    Some(MidiTarget {
                        cc: binding.clamped_cc(),
                        channel: binding.clamped_channel(),
                    }),
                    false,
                ),
                None => (None, false),
            };

            let start = parameters.len();
            push_parameters(&mut parameters, descriptor, &ident, position);

            planned.push(PlannedWidget {
                descriptor,
                ident,
                position,
                style_index: descriptor.style_index(),
                midi,
                midi_ignored,
                params: start..parameters.len(),
            });
        }

        let (editor_width, editor_height) = editor_size(widgets);
        log::debug!(
            "planned {} widget(s), {} parameter(s), editor {editor_width}x{editor_height} for {}",
            planned.len(),
            parameters.len(),
            identity.framework
        );

        Ok(Self {
            identity,
            widgets: planned,
            parameters,
            editor_width,
            editor_height,
        })
    }

    /// Parameters owned by `widget`, in index order
    pub fn parameters_of(&self, widget: &PlannedWidget<'_>) -> &[PlannedParameter] {
        &self.parameters[widget.params.clone()]
    }

    /// First parameter of `widget` (the bound axis for two-axis controls)
    pub fn primary_parameter(&self, widget: &PlannedWidget<'_>) -> Option<&PlannedParameter> {
        self.parameters_of(widget).first()
    }

    pub fn any_widget(&self, pred: impl Fn(&PlannedWidget<'a>) -> bool) -> bool {
        self.widgets.iter().any(pred)
    }

    pub fn has_midi_bindings(&self) -> bool {
        self.any_widget(|w| w.midi.is_some() || w.midi_ignored)
    }
}

fn push_parameters(
    out: &mut Vec<PlannedParameter>,
    descriptor: &WidgetDescriptor,
    ident: &str,
    widget: usize,
) {
    let mut push = |id: String, label: String, kind: ParamKind| {
        out.push(PlannedParameter {
            index: out.len(),
            id,
            label,
            widget,
            kind,
        });
    };
    let name = descriptor.name.trim();
    let label = if name.is_empty() { ident } else { name };

    match descriptor.kind.role() {
        ControlRole::Continuous { bipolar: false } => push(
            ident.to_string(),
            label.to_string(),
            ParamKind::Continuous {
                min: 0.0,
                max: 1.0,
                default: 0.5,
            },
        ),
        ControlRole::Continuous { bipolar: true } => push(
            ident.to_string(),
            label.to_string(),
            ParamKind::Continuous {
                min: -1.0,
                max: 1.0,
                default: 0.0,
            },
        ),
        ControlRole::Toggle => push(
            ident.to_string(),
            label.to_string(),
            ParamKind::Toggle { default: false },
        ),
        ControlRole::Choice => push(
            ident.to_string(),
            label.to_string(),
            ParamKind::Choice {
                options: descriptor.kind.choice_options(),
                default: 0,
            },
        ),
        ControlRole::TwoAxis { axes } => {
            let default = match descriptor.kind {
                WidgetKind::XyPad => 0.5,
                _ => 0.0,
            };
            for axis in axes {
                push(
                    format!("{ident}{axis}"),
                    format!("{label} {axis}"),
                    ParamKind::Continuous {
                        min: 0.0,
                        max: 1.0,
                        default,
                    },
                );
            }
        }
        ControlRole::Momentary | ControlRole::Display | ControlRole::Keyboard => {}
    }
}

fn editor_size(widgets: &[WidgetDescriptor]) -> (u32, u32) {
    let right = widgets.iter().map(|w| w.bounds.right()).max().unwrap_or(0);
    let bottom = widgets.iter().map(|w| w.bounds.bottom()).max().unwrap_or(0);
    let fit = |edge: i64, min: u32| -> u32 {
        let edge = (edge + EDITOR_MARGIN).clamp(0, i64::from(u32::MAX));
        (edge as u32).max(min)
    };
    (
        fit(right, MIN_EDITOR_WIDTH),
        fit(bottom, MIN_EDITOR_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::{Bounds, TransportAction};
    use pretty_assertions::assert_eq;

    const RULES: NamingRules = NamingRules {
        reserved: &["processorRef"],
        companions: &["Attachment"],
        class_suffixes: &["AudioProcessor"],
    };

    fn meta() -> ProjectMeta {
        ProjectMeta::new("MyPlugin", "Acme", Framework::Juce)
    }

    #[test]
    fn test_identity() {
        let identity = PluginIdentity::from_meta(&meta()).unwrap();
        assert_eq!(identity.class_name, "MyPlugin");
        assert_eq!(identity.plugin_code, "Mypl");
        assert_eq!(identity.manufacturer_code, "Acme");
        assert_eq!(identity.bundle_id, "com.acme.myplugin");
        assert_eq!(identity.version_triple(), "1.0.0");
        assert_eq!(
            identity.formats,
            vec![PluginFormat::Vst3, PluginFormat::Au, PluginFormat::Standalone]
        );
    }

    #[test]
    fn test_identity_version_fallback_and_prerelease() {
        let mut m = meta();
        m.version = "2.1.3-beta.1".into();
        let identity = PluginIdentity::from_meta(&m).unwrap();
        assert_eq!(identity.version_triple(), "2.1.3");

        m.version = "latest".into();
        let identity = PluginIdentity::from_meta(&m).unwrap();
        assert_eq!(identity.version, semver::Version::new(1, 0, 0));
    }

    #[test]
    fn test_empty_plugin_name_is_rejected() {
        let mut m = meta();
        m.name = " \t".into();
        assert!(matches!(
            ExportPlan::build(&[], &m, RULES),
            Err(CodegenError::MissingPluginName)
        ));
    }

    #[test]
    fn test_parameters_follow_insertion_order() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Label, "Title", 0, 0),
            WidgetDescriptor::placed(WidgetKind::XyPad, "Pad", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "Cutoff", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Transport(TransportAction::Stop), "Stop", 0, 0),
            WidgetDescriptor::placed(WidgetKind::ToggleButton, "Bypass", 0, 0),
        ];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        let ids: Vec<&str> = plan.parameters.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PadX", "PadY", "Cutoff", "Bypass"]);
        assert_eq!(plan.widgets[1].params, 0..2);
        assert_eq!(plan.widgets[3].params, 3..3);
        assert_eq!(plan.parameters_of(&plan.widgets[2])[0].index, 2);
        assert_eq!(plan.parameters[1].label, "Pad Y");
    }

    #[test]
    fn test_class_names_are_reserved() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Knob, "MyPluginAudioProcessor", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "OtherAudioProcessor", 0, 0),
        ];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!(plan.widgets[0].ident, "MyPluginAudioProcessor_2");
        assert_eq!(plan.widgets[1].ident, "OtherAudioProcessor");
    }

    #[test]
    fn test_two_axis_companions_prevent_clashes() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Knob, "PadX", 0, 0),
            WidgetDescriptor::placed(WidgetKind::XyPad, "Pad", 0, 0),
        ];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!(plan.widgets[1].ident, "Pad_2");
        assert_eq!(plan.parameters[1].id, "Pad_2X");
    }

    #[test]
    fn test_parameter_kinds() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::PitchWheel, "Bend", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Joystick, "Stick", 0, 0),
            WidgetDescriptor::placed(WidgetKind::IndexedSlider { options: vec![] }, "Mode", 0, 0),
        ];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!(
            plan.parameters[0].kind,
            ParamKind::Continuous { min: -1.0, max: 1.0, default: 0.0 }
        );
        assert_eq!(plan.parameters[0].kind.default_normalized(), 0.5);
        assert_eq!(plan.parameters[1].id, "StickRadius");
        assert_eq!(
            plan.parameters[1].kind,
            ParamKind::Continuous { min: 0.0, max: 1.0, default: 0.0 }
        );
        assert_eq!(
            plan.parameters[3].kind,
            ParamKind::Choice { options: vec!["Option 1".into()], default: 0 }
        );
    }

    #[test]
    fn test_midi_clamped_and_display_bindings_ignored() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Knob, "A", 0, 0).with_midi(500, -3),
            WidgetDescriptor::placed(WidgetKind::VuMeter, "B", 0, 0).with_midi(7, 1),
            WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "C", 0, 0),
        ];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!(plan.widgets[0].midi, Some(MidiTarget { cc: 127, channel: 1 }));
        assert_eq!(plan.widgets[1].midi, None);
        assert!(plan.widgets[1].midi_ignored);
        assert_eq!(plan.widgets[2].midi, None);
        assert!(!plan.widgets[2].midi_ignored);
        assert!(plan.has_midi_bindings());
    }

    #[test]
    fn test_editor_size() {
        let plan = ExportPlan::build(&[], &meta(), RULES).unwrap();
        assert_eq!((plan.editor_width, plan.editor_height), (400, 300));

        let widgets = vec![WidgetDescriptor::new(
            WidgetKind::AudioScope,
            "Scope",
            Bounds::new(500, 380, 300, 150),
        )];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!((plan.editor_width, plan.editor_height), (820, 550));

        let widgets = vec![WidgetDescriptor::new(
            WidgetKind::Knob,
            "Off",
            Bounds::new(-900, -900, 10, 10),
        )];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!((plan.editor_width, plan.editor_height), (400, 300));
    }

    #[test]
    fn test_style_index_is_resolved() {
        let mut widget = WidgetDescriptor::placed(WidgetKind::Slider, "S", 0, 0);
        widget.style.slider_style = 27;
        let widgets = vec![widget];
        let plan = ExportPlan::build(&widgets, &meta(), RULES).unwrap();
        assert_eq!(plan.widgets[0].style_index, 7);
    }
}
