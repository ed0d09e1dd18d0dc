use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::style::{StyleSlot, WidgetStyle};

/// Transport button subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportAction {
    Play,
    Pause,
    Stop,
    Record,
    Rewind,
    FastForward,
    Loop,
    Metronome,
    Tap,
    Sync,
    ReturnToZero,
    MarkerNext,
    MarkerPrevious,
    NudgeForward,
    NudgeBackward,
    Drop,
    Replace,
    AutomationMode,
    JogWheel,
    Scrub,
    PreRoll,
    PostRoll,
}

/// How a transport control behaves when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportBehavior {
    /// Stays engaged until pressed again
    Latching,
    /// Fires once per press
    Momentary,
    /// Continuous bipolar value (jog and scrub wheels)
    Continuous,
}

impl TransportAction {
    pub const ALL: [TransportAction; 22] = [
        TransportAction::Play,
        TransportAction::Pause,
        TransportAction::Stop,
        TransportAction::Record,
        TransportAction::Rewind,
        TransportAction::FastForward,
        TransportAction::Loop,
        TransportAction::Metronome,
        TransportAction::Tap,
        TransportAction::Sync,
        TransportAction::ReturnToZero,
        TransportAction::MarkerNext,
        TransportAction::MarkerPrevious,
        TransportAction::NudgeForward,
        TransportAction::NudgeBackward,
        TransportAction::Drop,
        TransportAction::Replace,
        TransportAction::AutomationMode,
        TransportAction::JogWheel,
        TransportAction::Scrub,
        TransportAction::PreRoll,
        TransportAction::PostRoll,
    ];

    /// Button caption
    pub fn label(self) -> &'static str {
        match self {
            TransportAction::Play => "Play",
            TransportAction::Pause => "Pause",
            TransportAction::Stop => "Stop",
            TransportAction::Record => "Record",
            TransportAction::Rewind => "Rewind",
            TransportAction::FastForward => "Fast Forward",
            TransportAction::Loop => "Loop",
            TransportAction::Metronome => "Metronome",
            TransportAction::Tap => "Tap",
            TransportAction::Sync => "Sync",
            TransportAction::ReturnToZero => "Return To Zero",
            TransportAction::MarkerNext => "Next Marker",
            TransportAction::MarkerPrevious => "Previous Marker",
            TransportAction::NudgeForward => "Nudge Forward",
            TransportAction::NudgeBackward => "Nudge Backward",
            TransportAction::Drop => "Drop",
            TransportAction::Replace => "Replace",
            TransportAction::AutomationMode => "Automation",
            TransportAction::JogWheel => "Jog",
            TransportAction::Scrub => "Scrub",
            TransportAction::PreRoll => "Pre-Roll",
            TransportAction::PostRoll => "Post-Roll",
        }
    }

    /// Snake-case key, identical to the serialized form
    pub fn slug(self) -> &'static str {
        match self {
            TransportAction::Play => "play",
            TransportAction::Pause => "pause",
            TransportAction::Stop => "stop",
            TransportAction::Record => "record",
            TransportAction::Rewind => "rewind",
            TransportAction::FastForward => "fast_forward",
            TransportAction::Loop => "loop",
            TransportAction::Metronome => "metronome",
            TransportAction::Tap => "tap",
            TransportAction::Sync => "sync",
            TransportAction::ReturnToZero => "return_to_zero",
            TransportAction::MarkerNext => "marker_next",
            TransportAction::MarkerPrevious => "marker_previous",
            TransportAction::NudgeForward => "nudge_forward",
            TransportAction::NudgeBackward => "nudge_backward",
            TransportAction::Drop => "drop",
            TransportAction::Replace => "replace",
            TransportAction::AutomationMode => "automation_mode",
            TransportAction::JogWheel => "jog_wheel",
            TransportAction::Scrub => "scrub",
            TransportAction::PreRoll => "pre_roll",
            TransportAction::PostRoll => "post_roll",
        }
    }

    pub fn behavior(self) -> TransportBehavior {
        use TransportAction::*;
        match self {
            Play | Pause | Record | Loop | Metronome | Sync | Drop | Replace | AutomationMode
            | PreRoll | PostRoll => TransportBehavior::Latching,
            Stop | Rewind | FastForward | Tap | ReturnToZero | MarkerNext | MarkerPrevious
            | NudgeForward | NudgeBackward => TransportBehavior::Momentary,
            JogWheel | Scrub => TransportBehavior::Continuous,
        }
    }
}

/// Closed widget taxonomy. Every generator handles every variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Knob,
    Slider,
    Button,
    Label,
    Waveform,
    Meter,
    XyPad,
    Joystick,
    PitchWheel,
    IndexedSlider {
        #[serde(default)]
        options: Vec<String>,
    },
    BasicMeter,
    VuMeter,
    LedMeter,
    AudioScope,
    VerticalFader,
    ImageButton,
    ToggleButton,
    Transport(TransportAction),
    MidiKeyboard,
}

/// Parameter behaviour derived from a widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    /// One float parameter, `-1..1` when bipolar, otherwise `0..1`
    Continuous { bipolar: bool },
    /// One boolean parameter
    Toggle,
    /// Trigger without host parameter
    Momentary,
    /// One choice parameter over the option labels
    Choice,
    /// Two float parameters, one per axis
    TwoAxis { axes: [&'static str; 2] },
    /// Read-only visualisation
    Display,
    /// Note input; a MIDI binding selects its channel
    Keyboard,
}

impl ControlRole {
    /// Host parameters contributed by one widget with this role
    pub fn parameter_count(self) -> usize {
        match self {
            ControlRole::Continuous { .. } | ControlRole::Toggle | ControlRole::Choice => 1,
            ControlRole::TwoAxis { .. } => 2,
            ControlRole::Momentary | ControlRole::Display | ControlRole::Keyboard => 0,
        }
    }

    /// Whether a MIDI binding has anything to drive
    pub fn accepts_midi(self) -> bool {
        !matches!(self, ControlRole::Display)
    }
}

pub const DEFAULT_OPTION_LABEL: &str = "Option 1";

impl WidgetKind {
    /// One value of every kind, transport actions expanded, in palette order
    pub fn catalog() -> Vec<WidgetKind> {
        let mut kinds = vec![
            WidgetKind::Knob,
            WidgetKind::Slider,
            WidgetKind::Button,
            WidgetKind::Label,
            WidgetKind::Waveform,
            WidgetKind::Meter,
            WidgetKind::XyPad,
            WidgetKind::Joystick,
            WidgetKind::PitchWheel,
            WidgetKind::IndexedSlider {
                options: vec![
                    "Option 1".to_string(),
                    "Option 2".to_string(),
                    "Option 3".to_string(),
                ],
            },
            WidgetKind::BasicMeter,
            WidgetKind::VuMeter,
            WidgetKind::LedMeter,
            WidgetKind::AudioScope,
            WidgetKind::VerticalFader,
            WidgetKind::ImageButton,
            WidgetKind::ToggleButton,
        ];
        kinds.extend(TransportAction::ALL.iter().copied().map(WidgetKind::Transport));
        kinds.push(WidgetKind::MidiKeyboard);
        kinds
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetKind::Knob => "Knob",
            WidgetKind::Slider => "Slider",
            WidgetKind::Button => "Button",
            WidgetKind::Label => "Label",
            WidgetKind::Waveform => "Waveform",
            WidgetKind::Meter => "Meter",
            WidgetKind::XyPad => "XY Pad",
            WidgetKind::Joystick => "Joystick",
            WidgetKind::PitchWheel => "Pitch Wheel",
            WidgetKind::IndexedSlider { .. } => "Indexed Slider",
            WidgetKind::BasicMeter => "Basic Meter",
            WidgetKind::VuMeter => "VU Meter",
            WidgetKind::LedMeter => "LED Meter",
            WidgetKind::AudioScope => "Audio Scope",
            WidgetKind::VerticalFader => "Vertical Fader",
            WidgetKind::ImageButton => "Image Button",
            WidgetKind::ToggleButton => "Toggle Button",
            WidgetKind::Transport(action) => action.label(),
            WidgetKind::MidiKeyboard => "MIDI Keyboard",
        }
    }

    pub fn role(&self) -> ControlRole {
        match self {
            WidgetKind::Knob | WidgetKind::Slider | WidgetKind::VerticalFader => {
                ControlRole::Continuous { bipolar: false }
            }
            WidgetKind::PitchWheel => ControlRole::Continuous { bipolar: true },
            WidgetKind::ToggleButton | WidgetKind::ImageButton => ControlRole::Toggle,
            WidgetKind::Button => ControlRole::Momentary,
            WidgetKind::IndexedSlider { .. } => ControlRole::Choice,
            WidgetKind::XyPad => ControlRole::TwoAxis { axes: ["X", "Y"] },
            WidgetKind::Joystick => ControlRole::TwoAxis {
                axes: ["Radius", "Angle"],
            },
            WidgetKind::Label
            | WidgetKind::Waveform
            | WidgetKind::Meter
            | WidgetKind::BasicMeter
            | WidgetKind::VuMeter
            | WidgetKind::LedMeter
            | WidgetKind::AudioScope => ControlRole::Display,
            WidgetKind::MidiKeyboard => ControlRole::Keyboard,
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Latching => ControlRole::Toggle,
                TransportBehavior::Momentary => ControlRole::Momentary,
                TransportBehavior::Continuous => ControlRole::Continuous { bipolar: true },
            },
        }
    }

    pub fn style_slot(&self) -> StyleSlot {
        match self {
            WidgetKind::Slider
            | WidgetKind::VerticalFader
            | WidgetKind::PitchWheel
            | WidgetKind::IndexedSlider { .. } => StyleSlot::Slider,
            WidgetKind::Button | WidgetKind::ImageButton | WidgetKind::ToggleButton => {
                StyleSlot::Button
            }
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Continuous => StyleSlot::Knob,
                _ => StyleSlot::Button,
            },
            WidgetKind::Label => StyleSlot::Label,
            WidgetKind::Knob
            | WidgetKind::Waveform
            | WidgetKind::Meter
            | WidgetKind::XyPad
            | WidgetKind::Joystick
            | WidgetKind::BasicMeter
            | WidgetKind::VuMeter
            | WidgetKind::LedMeter
            | WidgetKind::AudioScope
            | WidgetKind::MidiKeyboard => StyleSlot::Knob,
        }
    }

    /// Size a freshly placed widget gets on the canvas
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            WidgetKind::Knob => (80, 80),
            WidgetKind::Slider | WidgetKind::IndexedSlider { .. } => (200, 40),
            WidgetKind::Button | WidgetKind::ToggleButton => (100, 30),
            WidgetKind::Label => (100, 24),
            WidgetKind::Waveform => (300, 100),
            WidgetKind::Meter => (30, 150),
            WidgetKind::XyPad => (150, 150),
            WidgetKind::Joystick => (120, 120),
            WidgetKind::PitchWheel => (40, 150),
            WidgetKind::BasicMeter | WidgetKind::LedMeter => (20, 150),
            WidgetKind::VuMeter => (150, 80),
            WidgetKind::AudioScope => (300, 150),
            WidgetKind::VerticalFader => (40, 200),
            WidgetKind::ImageButton => (64, 64),
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Continuous => (80, 80),
                _ => (48, 32),
            },
            WidgetKind::MidiKeyboard => (400, 80),
        }
    }

    /// Option labels of a choice control, never empty
    pub fn choice_options(&self) -> Vec<String> {
        match self {
            WidgetKind::IndexedSlider { options } if !options.is_empty() => options.clone(),
            _ => vec![DEFAULT_OPTION_LABEL.to_string()],
        }
    }
}

/// Integer rectangle in canvas pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Raw MIDI CC assignment as entered in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MidiBinding {
    pub cc: i32,
    #[serde(default = "default_channel")]
    pub channel: i32,
}

fn default_channel() -> i32 {
    1
}

impl MidiBinding {
    pub fn new(cc: i32, channel: i32) -> Self {
        Self { cc, channel }
    }

    pub fn clamped_cc(&self) -> u8 {
        self.cc.clamp(0, 127) as u8
    }

    pub fn clamped_channel(&self) -> u8 {
        self.channel.clamp(1, 16) as u8
    }

    pub fn cc_in_range(&self) -> bool {
        (0..=127).contains(&self.cc)
    }

    pub fn channel_in_range(&self) -> bool {
        (1..=16).contains(&self.channel)
    }
}

/// One placed widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDescriptor {
    pub kind: WidgetKind,
    /// Editor-side name; sanitized into an identifier by the generators
    pub name: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub style: WidgetStyle,
    #[serde(default, rename = "midiBinding", skip_serializing_if = "Option::is_none")]
    pub midi: Option<MidiBinding>,
}

impl WidgetDescriptor {
    pub fn new(kind: WidgetKind, name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            kind,
            name: name.into(),
            bounds,
            style: WidgetStyle::default(),
            midi: None,
        }
    }

    /// Widget at `(x, y)` with the kind's default size
    pub fn placed(kind: WidgetKind, name: impl Into<String>, x: i32, y: i32) -> Self {
        let (width, height) = kind.default_size();
        Self::new(kind, name, Bounds::new(x, y, width, height))
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_midi(mut self, cc: i32, channel: i32) -> Self {
        self.midi = Some(MidiBinding::new(cc, channel));
        self
    }

    pub fn role(&self) -> ControlRole {
        self.kind.role()
    }

    pub fn style_index(&self) -> usize {
        self.style.style_index(self.kind.style_slot())
    }
}
