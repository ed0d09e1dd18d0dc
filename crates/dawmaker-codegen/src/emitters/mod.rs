pub mod dpf;
pub mod elements;
pub mod iplug2;
pub mod juce;

use dawmaker_model::{ControlRole, Framework, WidgetKind};

use crate::plan::{ExportPlan, PlannedWidget};
use crate::traits::SourceEmitter;

/// Create the source emitter for the given framework.
pub fn create_emitter(framework: Framework) -> Box<dyn SourceEmitter> {
    match framework {
        Framework::Juce => Box::new(juce::JuceEmitter),
        Framework::Iplug2 => Box::new(iplug2::Iplug2Emitter),
        Framework::Dpf => Box::new(dpf::DpfEmitter),
        Framework::Elements => Box::new(elements::ElementsEmitter),
    }
}

/// Display kinds that need a live signal from the audio thread.
pub(crate) fn needs_signal(kind: &WidgetKind) -> bool {
    kind.role() == ControlRole::Display && !matches!(kind, WidgetKind::Label)
}

/// Widgets whose binding drives a host parameter or trigger (everything
/// bound except the keyboard, whose binding only selects a channel).
pub(crate) fn cc_bound<'p, 'a>(
    plan: &'p ExportPlan<'a>,
) -> impl Iterator<Item = &'p PlannedWidget<'a>> {
    plan.widgets
        .iter()
        .filter(|w| w.midi.is_some() && w.role() != ControlRole::Keyboard)
}

/// Caption for button-like widgets: the transport label, otherwise the name.
pub(crate) fn caption<'w>(widget: &'w PlannedWidget<'_>) -> &'w str {
    match widget.kind() {
        WidgetKind::Transport(action) => action.label(),
        _ => widget.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingRules;
    use dawmaker_model::{ProjectMeta, TransportAction, WidgetDescriptor};

    #[test]
    fn test_create_emitter_matches_framework() {
        for framework in Framework::ALL {
            assert_eq!(create_emitter(framework).framework(), framework);
        }
    }

    #[test]
    fn test_signal_kinds() {
        assert!(needs_signal(&WidgetKind::VuMeter));
        assert!(needs_signal(&WidgetKind::AudioScope));
        assert!(!needs_signal(&WidgetKind::Label));
        assert!(!needs_signal(&WidgetKind::Knob));
    }

    #[test]
    fn test_cc_bound_skips_keyboard() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "Keys", 0, 0).with_midi(0, 2),
            WidgetDescriptor::placed(WidgetKind::Knob, "Cutoff", 0, 0).with_midi(74, 1),
            WidgetDescriptor::placed(WidgetKind::Transport(TransportAction::Play), "Go", 0, 0),
        ];
        let meta = ProjectMeta::new("P", "Acme", Framework::Juce);
        let plan = ExportPlan::build(&widgets, &meta, NamingRules::default()).unwrap();
        let bound: Vec<&str> = cc_bound(&plan).map(|w| w.ident.as_str()).collect();
        assert_eq!(bound, vec!["Cutoff"]);
        assert_eq!(caption(&plan.widgets[2]), "Play");
        assert_eq!(caption(&plan.widgets[1]), "Cutoff");
    }
}
