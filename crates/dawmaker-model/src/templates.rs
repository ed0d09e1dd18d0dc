use std::fmt;
use std::str::FromStr;

use crate::types::common::Framework;
use crate::types::project::{LayoutDocument, ProjectMeta};
use crate::types::widget::{TransportAction, WidgetDescriptor, WidgetKind};

/// Starter layouts offered by `dawmaker init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectTemplate {
    Synthesizer,
    AudioEffect,
    MidiUtility,
    BasicDaw,
    AudioAnalyzer,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 5] = [
        ProjectTemplate::Synthesizer,
        ProjectTemplate::AudioEffect,
        ProjectTemplate::MidiUtility,
        ProjectTemplate::BasicDaw,
        ProjectTemplate::AudioAnalyzer,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ProjectTemplate::Synthesizer => "synthesizer",
            ProjectTemplate::AudioEffect => "audio-effect",
            ProjectTemplate::MidiUtility => "midi-utility",
            ProjectTemplate::BasicDaw => "basic-daw",
            ProjectTemplate::AudioAnalyzer => "audio-analyzer",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProjectTemplate::Synthesizer => "Synthesizer",
            ProjectTemplate::AudioEffect => "Audio Effect",
            ProjectTemplate::MidiUtility => "MIDI Utility",
            ProjectTemplate::BasicDaw => "Basic DAW",
            ProjectTemplate::AudioAnalyzer => "Audio Analyzer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ProjectTemplate::Synthesizer => {
                "Polyphonic instrument with filter, envelope, waveform selector and keyboard"
            }
            ProjectTemplate::AudioEffect => "Insert effect with drive, mix, bypass and output meter",
            ProjectTemplate::MidiUtility => "MIDI processor with keyboard, velocity and channel routing",
            ProjectTemplate::BasicDaw => "Transport bar, four channel faders and a timeline view",
            ProjectTemplate::AudioAnalyzer => "Scope, level meters and waveform history",
        }
    }

    /// Starter widgets in creation order
    pub fn widgets(self) -> Vec<WidgetDescriptor> {
        use WidgetKind::*;
        fn at(kind: WidgetKind, name: impl Into<String>, x: i32, y: i32) -> WidgetDescriptor {
            WidgetDescriptor::placed(kind, name, x, y)
        }
        match self {
            ProjectTemplate::Synthesizer => vec![
                at(Label, "Title", 20, 16),
                at(Knob, "Cutoff", 20, 50).with_midi(74, 1),
                at(Knob, "Resonance", 110, 50).with_midi(71, 1),
                at(Knob, "Attack", 200, 50).with_midi(73, 1),
                at(Knob, "Decay", 290, 50),
                at(Knob, "Sustain", 380, 50),
                at(Knob, "Release", 470, 50).with_midi(72, 1),
                at(
                    IndexedSlider {
                        options: ["Sine", "Saw", "Square", "Triangle"]
                            .into_iter()
                            .map(String::from)
                            .collect(),
                    },
                    "Waveform",
                    20,
                    150,
                ),
                at(PitchWheel, "PitchBend", 20, 210),
                at(MidiKeyboard, "Keyboard", 80, 280),
            ],
            ProjectTemplate::AudioEffect => vec![
                at(Label, "Title", 20, 16),
                at(Knob, "Input", 20, 50),
                at(Knob, "Drive", 110, 50).with_midi(1, 1),
                at(Knob, "Mix", 200, 50),
                at(Knob, "Output", 290, 50),
                at(ToggleButton, "Bypass", 20, 150),
                at(Meter, "OutputLevel", 390, 40),
            ],
            ProjectTemplate::MidiUtility => vec![
                at(Label, "Title", 20, 16),
                at(Knob, "Velocity", 20, 50),
                at(
                    IndexedSlider {
                        options: (1..=16).map(|ch| format!("Ch {ch}")).collect(),
                    },
                    "Channel",
                    110,
                    70,
                ),
                at(ToggleButton, "Thru", 330, 75),
                at(MidiKeyboard, "Keys", 20, 150),
            ],
            ProjectTemplate::BasicDaw => {
                let mut widgets: Vec<WidgetDescriptor> = [
                    TransportAction::ReturnToZero,
                    TransportAction::Rewind,
                    TransportAction::Play,
                    TransportAction::Stop,
                    TransportAction::Record,
                    TransportAction::FastForward,
                    TransportAction::Loop,
                    TransportAction::Metronome,
                ]
                .into_iter()
                .enumerate()
                .map(|(i, action)| {
                    at(
                        Transport(action),
                        action.label().replace(' ', ""),
                        20 + 56 * i as i32,
                        16,
                    )
                })
                .collect();
                widgets.push(at(Transport(TransportAction::JogWheel), "Jog", 500, 8));
                widgets.push(at(Waveform, "Timeline", 20, 100));
                for track in 1..=4 {
                    widgets.push(at(
                        VerticalFader,
                        format!("Track{track}"),
                        340 + 60 * (track - 1),
                        100,
                    ));
                }
                widgets
            }
            ProjectTemplate::AudioAnalyzer => vec![
                at(Label, "Title", 20, 16),
                at(AudioScope, "Scope", 20, 50),
                at(VuMeter, "LeftVu", 340, 50),
                at(VuMeter, "RightVu", 340, 140),
                at(LedMeter, "Peak", 510, 50),
                at(Waveform, "History", 20, 220),
                at(
                    IndexedSlider {
                        options: vec!["1024".into(), "2048".into(), "4096".into()],
                    },
                    "Resolution",
                    340,
                    240,
                ),
            ],
        }
    }

    /// Complete starter document for a new project
    pub fn layout(self, name: &str, manufacturer: &str, framework: Framework) -> LayoutDocument {
        LayoutDocument::new(ProjectMeta::new(name, manufacturer, framework))
            .with_widgets(self.widgets())
    }
}

impl fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProjectTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase().replace('_', "-");
        ProjectTemplate::ALL
            .into_iter()
            .find(|t| t.slug() == key || t.slug().replace('-', "") == key)
            .ok_or_else(|| {
                let known: Vec<&str> = ProjectTemplate::ALL.iter().map(|t| t.slug()).collect();
                format!("unknown template '{s}', expected one of: {}", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_template_lints_clean() {
        for template in ProjectTemplate::ALL {
            let doc = template.layout("MyPlugin", "Acme", Framework::Juce);
            let report = lint::check(&doc, "layout.json");
            assert!(
                report.errors.is_empty(),
                "{template}: {:?}",
                report.errors
            );
        }
    }

    #[test]
    fn test_templates_are_deterministic() {
        for template in ProjectTemplate::ALL {
            assert_eq!(template.widgets(), template.widgets());
        }
    }

    #[test]
    fn test_basic_daw_transport_names() {
        let names: Vec<String> = ProjectTemplate::BasicDaw
            .widgets()
            .into_iter()
            .take(3)
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["ReturnToZero", "Rewind", "Play"]);
    }

    #[test]
    fn test_template_from_str() {
        assert_eq!(
            "basic-daw".parse::<ProjectTemplate>().unwrap(),
            ProjectTemplate::BasicDaw
        );
        assert_eq!(
            "AudioEffect".parse::<ProjectTemplate>().unwrap(),
            ProjectTemplate::AudioEffect
        );
        assert_eq!(
            "midi_utility".parse::<ProjectTemplate>().unwrap(),
            ProjectTemplate::MidiUtility
        );
        assert!("granular".parse::<ProjectTemplate>().is_err());
    }

    #[test]
    fn test_layout_carries_metadata() {
        let doc = ProjectTemplate::Synthesizer.layout("Synth", "Acme", Framework::Dpf);
        assert_eq!(doc.plugin.name, "Synth");
        assert_eq!(doc.plugin.framework, Framework::Dpf);
        assert_eq!(doc.widgets.len(), 10);
    }
}
