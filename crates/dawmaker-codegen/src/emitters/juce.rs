use dawmaker_model::{Color, ControlRole, Framework, TransportBehavior, WidgetKind};

use crate::context::{EmitContext, IndentStyle};
use crate::emitters::{caption, cc_bound, needs_signal};
use crate::naming::{cpp_float, cpp_string_literal, NamingRules};
use crate::plan::{ExportPlan, ParamKind, PlannedParameter, PlannedWidget};
use crate::traits::{ignored_binding_comment, SourceEmitter};

/// JUCE source emitter: an APVTS-backed processor and a component editor.
pub struct JuceEmitter;

const RESERVED: &[&str] = &[
    "processorRef",
    "keyboardState",
    "apvts",
    "outputLevel",
    "LevelMeter",
    "XYPad",
    "handleMidiBindings",
    "createParameterLayout",
    "paint",
    "resized",
    "setSize",
    "setBounds",
    "getWidth",
    "getHeight",
    "getName",
    "addAndMakeVisible",
    "repaint",
    "timerCallback",
    "startTimerHz",
    "stopTimer",
    "processor",
    "currentLevel",
    "AudioProcessor",
    "AudioProcessorEditor",
    "BusesProperties",
    "juce",
    "std",
];

const COMPANIONS: &[&str] = &["Attachment", "Triggered"];

const CLASS_SUFFIXES: &[&str] = &["AudioProcessor", "AudioProcessorEditor"];

const TIMER_HZ: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Rotary,
    Linear { vertical: bool },
    TextButton,
    ToggleButton,
    ImageButton,
    Label,
    Visualiser { buffer: u32 },
    Meter(&'static str),
    Pad(&'static str),
    Keyboard,
}

impl Component {
    fn of(widget: &PlannedWidget<'_>) -> Self {
        match widget.kind() {
            WidgetKind::Knob => Component::Rotary,
            WidgetKind::Slider | WidgetKind::IndexedSlider { .. } => {
                Component::Linear { vertical: false }
            }
            WidgetKind::VerticalFader | WidgetKind::PitchWheel => {
                Component::Linear { vertical: true }
            }
            WidgetKind::Button => Component::TextButton,
            WidgetKind::ToggleButton => Component::ToggleButton,
            WidgetKind::ImageButton => {
                if widget.descriptor.style.filmstrip().is_some() {
                    Component::ImageButton
                } else {
                    Component::TextButton
                }
            }
            WidgetKind::Label => Component::Label,
            WidgetKind::Waveform => Component::Visualiser { buffer: 1024 },
            WidgetKind::AudioScope => Component::Visualiser { buffer: 256 },
            WidgetKind::Meter | WidgetKind::BasicMeter => Component::Meter("Bar"),
            WidgetKind::VuMeter => Component::Meter("Vu"),
            WidgetKind::LedMeter => Component::Meter("Led"),
            WidgetKind::XyPad => Component::Pad("Cartesian"),
            WidgetKind::Joystick => Component::Pad("Polar"),
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Continuous => Component::Rotary,
                TransportBehavior::Latching | TransportBehavior::Momentary => {
                    Component::TextButton
                }
            },
            WidgetKind::MidiKeyboard => Component::Keyboard,
        }
    }

    fn is_slider(self) -> bool {
        matches!(self, Component::Rotary | Component::Linear { .. })
    }

    fn is_button(self) -> bool {
        matches!(
            self,
            Component::TextButton | Component::ToggleButton | Component::ImageButton
        )
    }
}

fn colour(c: Color) -> String {
    format!("juce::Colour (0x{})", c.to_hex())
}

fn attachment_type(widget: &PlannedWidget<'_>) -> Option<&'static str> {
    match widget.role() {
        ControlRole::Continuous { .. } | ControlRole::Choice => Some("SliderAttachment"),
        ControlRole::Toggle => Some("ButtonAttachment"),
        ControlRole::TwoAxis { .. }
        | ControlRole::Momentary
        | ControlRole::Display
        | ControlRole::Keyboard => None,
    }
}

fn parameter_line(param: &PlannedParameter) -> String {
    let id = format!(
        "juce::ParameterID {{ {}, 1 }}",
        cpp_string_literal(&param.id)
    );
    let label = cpp_string_literal(&param.label);
    match &param.kind {
        ParamKind::Continuous { min, max, default } => format!(
            "layout.add (std::make_unique<juce::AudioParameterFloat> ({id}, {label}, juce::NormalisableRange<float> ({}, {}), {}));",
            cpp_float(*min),
            cpp_float(*max),
            cpp_float(*default)
        ),
        ParamKind::Toggle { default } => format!(
            "layout.add (std::make_unique<juce::AudioParameterBool> ({id}, {label}, {default}));"
        ),
        ParamKind::Choice { options, default } => {
            let options: Vec<String> = options.iter().map(|o| cpp_string_literal(o)).collect();
            format!(
                "layout.add (std::make_unique<juce::AudioParameterChoice> ({id}, {label}, juce::StringArray {{ {} }}, {default}));",
                options.join(", ")
            )
        }
    }
}

struct Names {
    processor: String,
    editor: String,
}

impl Names {
    fn of(plan: &ExportPlan<'_>) -> Self {
        Self {
            processor: format!("{}AudioProcessor", plan.identity.class_name),
            editor: format!("{}AudioProcessorEditor", plan.identity.class_name),
        }
    }
}

struct Features {
    keyboard: bool,
    signal: bool,
    meters: bool,
    pads: bool,
    cc_glue: bool,
    cc_value: bool,
}

impl Features {
    fn of(plan: &ExportPlan<'_>) -> Self {
        Self {
            keyboard: plan.any_widget(|w| w.role() == ControlRole::Keyboard),
            signal: plan.any_widget(|w| needs_signal(w.kind())),
            meters: plan.any_widget(|w| matches!(Component::of(w), Component::Meter(_))),
            pads: plan.any_widget(|w| matches!(Component::of(w), Component::Pad(_))),
            cc_glue: cc_bound(plan).next().is_some(),
            cc_value: cc_bound(plan).any(|w| {
                matches!(
                    w.role(),
                    ControlRole::Continuous { .. } | ControlRole::Choice | ControlRole::TwoAxis { .. }
                )
            }),
        }
    }
}

impl SourceEmitter for JuceEmitter {
    fn framework(&self) -> Framework {
        Framework::Juce
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::spaces(4)
    }

    fn naming_rules(&self) -> NamingRules {
        NamingRules {
            reserved: RESERVED,
            companions: COMPANIONS,
            class_suffixes: CLASS_SUFFIXES,
        }
    }

    fn emit_declaration(
        &self,
        widget: &PlannedWidget<'_>,
        _plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let ident = &widget.ident;
        let decl = match Component::of(widget) {
            Component::Rotary | Component::Linear { .. } => format!("juce::Slider {ident};"),
            Component::TextButton => format!("juce::TextButton {ident};"),
            Component::ToggleButton => format!("juce::ToggleButton {ident};"),
            Component::ImageButton => format!("juce::ImageButton {ident};"),
            Component::Label => format!("juce::Label {ident};"),
            Component::Visualiser { .. } => {
                format!("juce::AudioVisualiserComponent {ident} {{ 1 }};")
            }
            Component::Meter(style) => {
                format!("LevelMeter {ident} {{ LevelMeter::Style::{style} }};")
            }
            Component::Pad(mode) => format!("XYPad {ident} {{ XYPad::Mode::{mode} }};"),
            Component::Keyboard => format!(
                "juce::MidiKeyboardComponent {ident} {{ processorRef.keyboardState, juce::MidiKeyboardComponent::horizontalKeyboard }};"
            ),
        };
        ctx.line(&decl)
    }

    fn emit_setup(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let ident = &widget.ident;
        let style = &widget.descriptor.style;
        let component = Component::of(widget);
        let mut lines = Vec::new();

        match component {
            Component::Rotary => {
                lines.push(format!(
                    "{ident}.setSliderStyle (juce::Slider::RotaryHorizontalVerticalDrag);"
                ));
                let fill = if style.fill_knob { style.knob_color } else { Color::TRANSPARENT };
                lines.push(format!(
                    "{ident}.setColour (juce::Slider::rotarySliderFillColourId, {});",
                    colour(fill)
                ));
                lines.push(format!(
                    "{ident}.setColour (juce::Slider::rotarySliderOutlineColourId, {});",
                    colour(style.bg_color)
                ));
            }
            Component::Linear { vertical } => {
                let slider_style = if vertical { "LinearVertical" } else { "LinearHorizontal" };
                lines.push(format!(
                    "{ident}.setSliderStyle (juce::Slider::{slider_style});"
                ));
                lines.push(format!(
                    "{ident}.setColour (juce::Slider::trackColourId, {});",
                    colour(style.knob_color)
                ));
                lines.push(format!(
                    "{ident}.setColour (juce::Slider::backgroundColourId, {});",
                    colour(style.bg_color)
                ));
            }
            Component::TextButton | Component::ImageButton | Component::ToggleButton => {}
            Component::Label => {
                lines.push(format!(
                    "{ident}.setText ({}, juce::dontSendNotification);",
                    cpp_string_literal(widget.name())
                ));
                lines.push(format!(
                    "{ident}.setJustificationType (juce::Justification::centred);"
                ));
                lines.push(format!(
                    "{ident}.setColour (juce::Label::textColourId, {});",
                    colour(style.text_color)
                ));
                lines.push(format!(
                    "{ident}.setColour (juce::Label::backgroundColourId, {});",
                    colour(style.bg_color)
                ));
            }
            Component::Visualiser { buffer } => {
                lines.push(format!("{ident}.setBufferSize ({buffer});"));
                lines.push(format!("{ident}.setSamplesPerBlock (16);"));
                lines.push(format!(
                    "{ident}.setColours ({}, {});",
                    colour(style.bg_color),
                    colour(style.knob_color)
                ));
            }
            Component::Meter(_) | Component::Pad(_) => {
                lines.push(format!(
                    "{ident}.setColours ({}, {});",
                    colour(style.bg_color),
                    colour(style.knob_color)
                ));
            }
            Component::Keyboard => {
                lines.push(format!(
                    "{ident}.setColour (juce::MidiKeyboardComponent::keyDownOverlayColourId, {});",
                    colour(style.knob_color)
                ));
            }
        }

        if component.is_slider() {
            lines.push(format!(
                "{ident}.setTextBoxStyle (juce::Slider::NoTextBox, false, 0, 0);"
            ));
            lines.push(format!(
                "{ident}.setColour (juce::Slider::thumbColourId, {});",
                colour(style.knob_color)
            ));
            if matches!(widget.role(), ControlRole::Continuous { bipolar: true }) {
                lines.push(format!(
                    "{ident}.onDragEnd = [this] {{ {ident}.setValue (0.0); }};"
                ));
            }
        }

        if component.is_button() {
            match component {
                Component::ImageButton => {
                    let path = style.filmstrip().unwrap_or_default();
                    lines.push(format!(
                        "{ident}.setImages (false, true, true, juce::ImageFileFormat::loadFrom (juce::File ({})), 1.0f, {{}}, {{}}, 0.8f, {{}}, {{}}, 1.0f, {{}});",
                        cpp_string_literal(path)
                    ));
                }
                Component::ToggleButton => {
                    lines.push(format!(
                        "{ident}.setButtonText ({});",
                        cpp_string_literal(caption(widget))
                    ));
                    lines.push(format!(
                        "{ident}.setColour (juce::ToggleButton::textColourId, {});",
                        colour(style.text_color)
                    ));
                    lines.push(format!(
                        "{ident}.setColour (juce::ToggleButton::tickColourId, {});",
                        colour(style.knob_color)
                    ));
                }
                _ => {
                    lines.push(format!(
                        "{ident}.setButtonText ({});",
                        cpp_string_literal(caption(widget))
                    ));
                    lines.push(format!(
                        "{ident}.setColour (juce::TextButton::buttonColourId, {});",
                        colour(style.bg_color)
                    ));
                    lines.push(format!(
                        "{ident}.setColour (juce::TextButton::buttonOnColourId, {});",
                        colour(style.knob_color)
                    ));
                    lines.push(format!(
                        "{ident}.setColour (juce::TextButton::textColourOffId, {});",
                        colour(style.text_color)
                    ));
                }
            }
            match widget.role() {
                ControlRole::Toggle if component != Component::ToggleButton => {
                    lines.push(format!("{ident}.setClickingTogglesState (true);"));
                }
                ControlRole::Momentary => {
                    lines.push(format!(
                        "{ident}.onClick = [this] {{ processorRef.{ident}Triggered.store (true); }};"
                    ));
                }
                _ => {}
            }
        }

        lines.push(format!(
            "{ident}.getProperties().set (\"styleIndex\", {});",
            widget.style_index
        ));
        lines.push(format!("addAndMakeVisible ({ident});"));

        if let Some(attachment) = attachment_type(widget) {
            let param = plan
                .primary_parameter(widget)
                .map(|p| p.id.as_str())
                .unwrap_or(ident);
            lines.push(format!(
                "{ident}Attachment = std::make_unique<juce::AudioProcessorValueTreeState::{attachment}> (processorRef.apvts, {}, {ident});",
                cpp_string_literal(param)
            ));
        }
        if let ControlRole::TwoAxis { .. } = widget.role() {
            let ids: Vec<String> = plan
                .parameters_of(widget)
                .iter()
                .map(|p| cpp_string_literal(&p.id))
                .collect();
            lines.push(format!(
                "{ident}.attach (processorRef.apvts, {});",
                ids.join(", ")
            ));
        }

        lines.iter().map(|l| ctx.line(l)).collect()
    }

    fn emit_midi_binding(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> Option<String> {
        if let Some(comment) = ignored_binding_comment(widget, "//") {
            return Some(ctx.line(&comment));
        }
        let target = widget.midi?;
        let ident = &widget.ident;
        let filter = format!("channel == {} && cc == {}", target.channel, target.cc);

        let block = match widget.role() {
            ControlRole::Keyboard => format!("{ident}.setMidiChannel ({});", target.channel),
            ControlRole::Momentary => {
                format!("if ({filter} && raw >= 64)\n    {ident}Triggered.store (true);")
            }
            role => {
                let param = plan.primary_parameter(widget)?;
                let value = if role == ControlRole::Toggle {
                    "raw >= 64 ? 1.0f : 0.0f"
                } else {
                    "value"
                };
                format!(
                    "if ({filter})\n{{\n    if (auto* param = apvts.getParameter ({}))\n        param->setValueNotifyingHost ({value});\n}}",
                    cpp_string_literal(&param.id)
                )
            }
        };
        Some(ctx.lines(&block))
    }

    fn emit_sources(&self, plan: &ExportPlan<'_>) -> Vec<(String, String)> {
        let names = Names::of(plan);
        let features = Features::of(plan);
        vec![
            (
                "Source/PluginProcessor.h".to_string(),
                self.processor_header(plan, &names, &features),
            ),
            (
                "Source/PluginProcessor.cpp".to_string(),
                self.processor_source(plan, &names, &features),
            ),
            (
                "Source/PluginEditor.h".to_string(),
                self.editor_header(plan, &names, &features),
            ),
            (
                "Source/PluginEditor.cpp".to_string(),
                self.editor_source(plan, &names, &features),
            ),
        ]
    }
}

impl JuceEmitter {
    fn processor_header(&self, plan: &ExportPlan<'_>, names: &Names, features: &Features) -> String {
        let mut ctx = self.new_context();
        ctx.push_indent();

        let mut state = String::new();
        state.push_str(&ctx.line("juce::AudioProcessorValueTreeState apvts;"));
        if features.keyboard {
            state.push_str(&ctx.line("juce::MidiKeyboardState keyboardState;"));
        }
        for widget in plan.widgets.iter().filter(|w| w.role() == ControlRole::Momentary) {
            state.push_str(&ctx.line(&format!(
                "std::atomic<bool> {}Triggered {{ false }};",
                widget.ident
            )));
        }
        if features.signal {
            state.push_str(&ctx.line("std::atomic<float> outputLevel { 0.0f };"));
        }

        let private = if features.cc_glue {
            ctx.line("void handleMidiBindings (const juce::MidiBuffer& midi);") + "\n"
        } else {
            String::new()
        };

        format!(
            r#"#pragma once

#include <JuceHeader.h>

class {processor} : public juce::AudioProcessor
{{
public:
    {processor}();
    ~{processor}() override;

    void prepareToPlay (double sampleRate, int samplesPerBlock) override;
    void releaseResources() override;
    bool isBusesLayoutSupported (const BusesLayout& layouts) const override;
    void processBlock (juce::AudioBuffer<float>&, juce::MidiBuffer&) override;

    juce::AudioProcessorEditor* createEditor() override;
    bool hasEditor() const override;

    const juce::String getName() const override;
    bool acceptsMidi() const override;
    bool producesMidi() const override;
    bool isMidiEffect() const override;
    double getTailLengthSeconds() const override;

    int getNumPrograms() override;
    int getCurrentProgram() override;
    void setCurrentProgram (int index) override;
    const juce::String getProgramName (int index) override;
    void changeProgramName (int index, const juce::String& newName) override;

    void getStateInformation (juce::MemoryBlock& destData) override;
    void setStateInformation (const void* data, int sizeInBytes) override;

    static juce::AudioProcessorValueTreeState::ParameterLayout createParameterLayout();

{state}
private:
{private}    JUCE_DECLARE_NON_COPYABLE_WITH_LEAK_DETECTOR ({processor})
}};
"#,
            processor = names.processor,
        )
    }

    fn processor_source(&self, plan: &ExportPlan<'_>, names: &Names, features: &Features) -> String {
        let mut ctx = self.new_context();
        ctx.push_indent();
        let processor = &names.processor;
        let mut out = String::new();

        out.push_str(&format!(
            r#"#include "PluginProcessor.h"
#include "PluginEditor.h"

{processor}::{processor}()
    : AudioProcessor (BusesProperties()
                          .withInput ("Input", juce::AudioChannelSet::stereo(), true)
                          .withOutput ("Output", juce::AudioChannelSet::stereo(), true)),
      apvts (*this, nullptr, "Parameters", createParameterLayout())
{{
}}

{processor}::~{processor}() = default;

juce::AudioProcessorValueTreeState::ParameterLayout {processor}::createParameterLayout()
{{
    juce::AudioProcessorValueTreeState::ParameterLayout layout;
"#
        ));
        if !plan.parameters.is_empty() {
            out.push('\n');
        }
        for param in &plan.parameters {
            out.push_str(&ctx.line(&parameter_line(param)));
        }
        out.push_str(
            "\n    return layout;\n}\n\n",
        );

        out.push_str(&format!(
            r#"void {processor}::prepareToPlay (double sampleRate, int samplesPerBlock)
{{
    juce::ignoreUnused (sampleRate, samplesPerBlock);
}}

void {processor}::releaseResources()
{{
}}

bool {processor}::isBusesLayoutSupported (const BusesLayout& layouts) const
{{
    if (layouts.getMainOutputChannelSet() != juce::AudioChannelSet::mono()
        && layouts.getMainOutputChannelSet() != juce::AudioChannelSet::stereo())
        return false;

    return layouts.getMainOutputChannelSet() == layouts.getMainInputChannelSet();
}}

void {processor}::processBlock (juce::AudioBuffer<float>& buffer, juce::MidiBuffer& midiMessages)
{{
    juce::ScopedNoDenormals noDenormals;
"#
        ));
        if features.keyboard {
            out.push_str(&ctx.line(
                "keyboardState.processNextMidiBuffer (midiMessages, 0, buffer.getNumSamples(), true);",
            ));
        }
        if features.cc_glue {
            out.push_str(&ctx.line("handleMidiBindings (midiMessages);"));
        }
        if !features.keyboard && !features.cc_glue {
            out.push_str(&ctx.line("juce::ignoreUnused (midiMessages);"));
        }
        out.push_str(
            r#"
    for (auto channel = getTotalNumInputChannels(); channel < getTotalNumOutputChannels(); ++channel)
        buffer.clear (channel, 0, buffer.getNumSamples());
"#,
        );
        if features.signal {
            out.push('\n');
            out.push_str(&ctx.line(
                "outputLevel.store (buffer.getMagnitude (0, buffer.getNumSamples()));",
            ));
        }
        out.push_str("}\n\n");

        if features.cc_glue {
            out.push_str(&format!(
                r#"void {processor}::handleMidiBindings (const juce::MidiBuffer& midi)
{{
    for (const auto metadata : midi)
    {{
        const auto message = metadata.getMessage();
        if (! message.isController())
            continue;

        const auto channel = message.getChannel();
        const auto cc = message.getControllerNumber();
        const auto raw = message.getControllerValue();
"#
            ));
            ctx.push_indent();
            if features.cc_value {
                out.push_str(&ctx.line("const auto value = (float) raw / 127.0f;"));
            }
            for widget in cc_bound(plan) {
                if let Some(glue) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    out.push('\n');
                    out.push_str(&glue);
                }
            }
            ctx.pop_indent();
            out.push_str("    }\n}\n\n");
        }

        out.push_str(&format!(
            r#"juce::AudioProcessorEditor* {processor}::createEditor()
{{
    return new {editor} (*this);
}}

bool {processor}::hasEditor() const
{{
    return true;
}}

const juce::String {processor}::getName() const
{{
    return JucePlugin_Name;
}}

bool {processor}::acceptsMidi() const
{{
    return true;
}}

bool {processor}::producesMidi() const
{{
    return false;
}}

bool {processor}::isMidiEffect() const
{{
    return false;
}}

double {processor}::getTailLengthSeconds() const
{{
    return 0.0;
}}

int {processor}::getNumPrograms()
{{
    return 1;
}}

int {processor}::getCurrentProgram()
{{
    return 0;
}}

void {processor}::setCurrentProgram (int index)
{{
    juce::ignoreUnused (index);
}}

const juce::String {processor}::getProgramName (int index)
{{
    juce::ignoreUnused (index);
    return {{}};
}}

void {processor}::changeProgramName (int index, const juce::String& newName)
{{
    juce::ignoreUnused (index, newName);
}}

void {processor}::getStateInformation (juce::MemoryBlock& destData)
{{
    if (auto xml = apvts.copyState().createXml())
        copyXmlToBinary (*xml, destData);
}}

void {processor}::setStateInformation (const void* data, int sizeInBytes)
{{
    if (auto xml = getXmlFromBinary (data, sizeInBytes))
        if (xml->hasTagName (apvts.state.getType()))
            apvts.replaceState (juce::ValueTree::fromXml (*xml));
}}

juce::AudioProcessor* JUCE_CALLTYPE createPluginFilter()
{{
    return new {processor}();
}}
"#,
            editor = names.editor,
        ));
        out
    }

    fn editor_header(&self, plan: &ExportPlan<'_>, names: &Names, features: &Features) -> String {
        let mut ctx = self.new_context();
        ctx.push_indent();

        let mut helpers = String::new();
        if features.meters {
            helpers.push_str(LEVEL_METER);
            helpers.push('\n');
        }
        if features.pads {
            helpers.push_str(XY_PAD);
            helpers.push('\n');
        }

        let bases = if features.signal {
            "public juce::AudioProcessorEditor,\n                                       private juce::Timer"
        } else {
            "public juce::AudioProcessorEditor"
        };
        let timer = if features.signal {
            ctx.line("void timerCallback() override;") + "\n"
        } else {
            String::new()
        };

        let mut members = String::new();
        for widget in &plan.widgets {
            members.push_str(&self.emit_declaration(widget, plan, &mut ctx));
        }
        let attachments: String = plan
            .widgets
            .iter()
            .filter_map(|w| {
                attachment_type(w).map(|a| {
                    ctx.line(&format!(
                        "std::unique_ptr<juce::AudioProcessorValueTreeState::{a}> {}Attachment;",
                        w.ident
                    ))
                })
            })
            .collect();
        if !members.is_empty() {
            members.insert(0, '\n');
        }
        if !attachments.is_empty() {
            members.push('\n');
            members.push_str(&attachments);
        }

        format!(
            r#"#pragma once

#include "PluginProcessor.h"

{helpers}class {editor} : {bases}
{{
public:
    explicit {editor} ({processor}&);
    ~{editor}() override;

    void paint (juce::Graphics&) override;
    void resized() override;

private:
{timer}    {processor}& processorRef;
{members}
    JUCE_DECLARE_NON_COPYABLE_WITH_LEAK_DETECTOR ({editor})
}};
"#,
            editor = names.editor,
            processor = names.processor,
        )
    }

    fn editor_source(&self, plan: &ExportPlan<'_>, names: &Names, features: &Features) -> String {
        let mut ctx = self.new_context();
        ctx.push_indent();
        let editor = &names.editor;

        let mut body = String::new();
        for widget in &plan.widgets {
            body.push_str(&self.emit_setup(widget, plan, &mut ctx));
            let local_binding = widget.midi_ignored || widget.role() == ControlRole::Keyboard;
            if local_binding {
                if let Some(binding) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    body.push_str(&binding);
                }
            }
            body.push('\n');
        }
        let uses_processor = features.signal
            || plan.any_widget(|w| {
                attachment_type(w).is_some()
                    || matches!(
                        w.role(),
                        ControlRole::Momentary | ControlRole::Keyboard | ControlRole::TwoAxis { .. }
                    )
            });
        if !uses_processor {
            body.push_str(&ctx.line("juce::ignoreUnused (processorRef);"));
        }
        if features.signal {
            body.push_str(&ctx.line(&format!("startTimerHz ({TIMER_HZ});")));
        }
        body.push_str(&ctx.line(&format!(
            "setSize ({}, {});",
            plan.editor_width, plan.editor_height
        )));

        let mut borders = String::new();
        for widget in &plan.widgets {
            let style = &widget.descriptor.style;
            if style.border_color.is_transparent() || style.border_width <= 0.0 {
                continue;
            }
            let b = widget.descriptor.bounds;
            borders.push_str(&ctx.line(&format!("g.setColour ({});", colour(style.border_color))));
            borders.push_str(&ctx.line(&format!(
                "g.drawRoundedRectangle ({{ {}, {}, {}, {} }}, {}, {});",
                cpp_float(b.x as f32),
                cpp_float(b.y as f32),
                cpp_float(b.width as f32),
                cpp_float(b.height as f32),
                cpp_float(style.corner_radius),
                cpp_float(style.border_width)
            )));
        }

        let layout: String = plan
            .widgets
            .iter()
            .map(|w| {
                let b = w.descriptor.bounds;
                ctx.line(&format!(
                    "{}.setBounds ({}, {}, {}, {});",
                    w.ident, b.x, b.y, b.width, b.height
                ))
            })
            .collect();

        let mut out = format!(
            r#"#include "PluginProcessor.h"
#include "PluginEditor.h"

{editor}::{editor} ({processor}& processor)
    : AudioProcessorEditor (&processor), processorRef (processor)
{{
{body}}}

{editor}::~{editor}() = default;

void {editor}::paint (juce::Graphics& g)
{{
    g.fillAll (getLookAndFeel().findColour (juce::ResizableWindow::backgroundColourId));
{borders}}}

void {editor}::resized()
{{
{layout}}}
"#,
            processor = names.processor,
        );

        if features.signal {
            let mut feed = ctx.line("const auto currentLevel = processorRef.outputLevel.load();");
            for widget in plan.widgets.iter().filter(|w| needs_signal(w.kind())) {
                let line = match Component::of(widget) {
                    Component::Visualiser { .. } => {
                        format!("{}.pushSample (&currentLevel, 1);", widget.ident)
                    }
                    _ => format!("{}.setLevel (currentLevel);", widget.ident),
                };
                feed.push_str(&ctx.line(&line));
            }
            out.push_str(&format!(
                "\nvoid {editor}::timerCallback()\n{{\n{feed}}}\n"
            ));
        }
        out
    }
}

const LEVEL_METER: &str = r#"class LevelMeter : public juce::Component
{
public:
    enum class Style { Bar, Vu, Led };

    explicit LevelMeter (Style s) : style (s) {}

    void setColours (juce::Colour bg, juce::Colour fg)
    {
        background = bg;
        foreground = fg;
        repaint();
    }

    void setLevel (float newLevel)
    {
        level = juce::jlimit (0.0f, 1.0f, newLevel);
        repaint();
    }

    void paint (juce::Graphics& g) override
    {
        auto area = getLocalBounds().toFloat();
        g.setColour (background);
        g.fillRect (area);
        g.setColour (foreground);

        switch (style)
        {
            case Style::Bar:
                g.fillRect (area.removeFromBottom (area.getHeight() * level));
                break;
            case Style::Vu:
            {
                const auto pivot = juce::Point<float> (area.getCentreX(), area.getBottom());
                const auto angle = juce::MathConstants<float>::pi * (1.25f + 0.5f * level);
                const auto length = juce::jmin (area.getWidth() * 0.5f, area.getHeight()) * 0.9f;
                g.drawLine (pivot.x, pivot.y,
                            pivot.x + std::cos (angle) * length,
                            pivot.y + std::sin (angle) * length,
                            2.0f);
                break;
            }
            case Style::Led:
            {
                constexpr int segments = 12;
                const auto segmentHeight = area.getHeight() / (float) segments;
                for (int i = 0; i < segments; ++i)
                {
                    auto segment = area.removeFromBottom (segmentHeight).reduced (1.0f);
                    if ((float) i / (float) segments < level)
                        g.fillRect (segment);
                }
                break;
            }
        }
    }

private:
    Style style;
    float level = 0.0f;
    juce::Colour background { juce::Colours::black };
    juce::Colour foreground { juce::Colours::limegreen };
};
"#;

const XY_PAD: &str = r#"class XYPad : public juce::Component
{
public:
    enum class Mode { Cartesian, Polar };

    explicit XYPad (Mode m) : mode (m) {}

    void setColours (juce::Colour bg, juce::Colour fg)
    {
        background = bg;
        thumb = fg;
        repaint();
    }

    void attach (juce::AudioProcessorValueTreeState& state, const juce::String& xId, const juce::String& yId)
    {
        xAttachment = std::make_unique<juce::ParameterAttachment> (*state.getParameter (xId), [this] (float v) { x = v; repaint(); });
        yAttachment = std::make_unique<juce::ParameterAttachment> (*state.getParameter (yId), [this] (float v) { y = v; repaint(); });
        xAttachment->sendInitialUpdate();
        yAttachment->sendInitialUpdate();
    }

    void paint (juce::Graphics& g) override
    {
        const auto area = getLocalBounds().toFloat().reduced (1.0f);
        g.setColour (background);
        g.fillRoundedRectangle (area, 4.0f);
        g.setColour (thumb);
        g.fillEllipse (juce::Rectangle<float> (12.0f, 12.0f).withCentre (thumbPosition (area)));
    }

    void mouseDown (const juce::MouseEvent& e) override
    {
        if (xAttachment != nullptr) xAttachment->beginGesture();
        if (yAttachment != nullptr) yAttachment->beginGesture();
        mouseDrag (e);
    }

    void mouseDrag (const juce::MouseEvent& e) override
    {
        const auto area = getLocalBounds().toFloat().reduced (1.0f);
        auto nx = juce::jlimit (0.0f, 1.0f, (e.position.x - area.getX()) / area.getWidth());
        auto ny = juce::jlimit (0.0f, 1.0f, (area.getBottom() - e.position.y) / area.getHeight());

        if (mode == Mode::Polar)
        {
            const auto offset = e.position - area.getCentre();
            nx = juce::jlimit (0.0f, 1.0f, offset.getDistanceFromOrigin() / radius (area));
            auto angle = std::atan2 (offset.y, offset.x);
            if (angle < 0.0f)
                angle += juce::MathConstants<float>::twoPi;
            ny = angle / juce::MathConstants<float>::twoPi;
        }

        if (xAttachment != nullptr) xAttachment->setValueAsPartOfGesture (nx);
        if (yAttachment != nullptr) yAttachment->setValueAsPartOfGesture (ny);
    }

    void mouseUp (const juce::MouseEvent&) override
    {
        if (xAttachment != nullptr) xAttachment->endGesture();
        if (yAttachment != nullptr) yAttachment->endGesture();
    }

private:
    static float radius (juce::Rectangle<float> area)
    {
        return juce::jmin (area.getWidth(), area.getHeight()) * 0.5f;
    }

    juce::Point<float> thumbPosition (juce::Rectangle<float> area) const
    {
        if (mode == Mode::Polar)
        {
            const auto angle = y * juce::MathConstants<float>::twoPi;
            return area.getCentre() + juce::Point<float> (std::cos (angle), std::sin (angle)) * (x * radius (area));
        }
        return { area.getX() + x * area.getWidth(), area.getBottom() - y * area.getHeight() };
    }

    Mode mode;
    float x = 0.5f, y = 0.5f;
    juce::Colour background { juce::Colours::darkgrey };
    juce::Colour thumb { juce::Colours::white };
    std::unique_ptr<juce::ParameterAttachment> xAttachment, yAttachment;
};
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::{Bounds, ProjectMeta, TransportAction, WidgetDescriptor};

    fn sources(widgets: &[WidgetDescriptor]) -> Vec<(String, String)> {
        let meta = ProjectMeta::new("MyPlugin", "Acme", Framework::Juce);
        let plan = ExportPlan::build(widgets, &meta, JuceEmitter.naming_rules()).unwrap();
        JuceEmitter.emit_sources(&plan)
    }

    fn file<'a>(files: &'a [(String, String)], path: &str) -> &'a str {
        files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.as_str())
            .unwrap_or_else(|| panic!("missing {path}"))
    }

    #[test]
    fn test_knob_declaration_and_layout() {
        let widgets = vec![WidgetDescriptor::new(
            WidgetKind::Knob,
            "Cutoff",
            Bounds::new(10, 10, 120, 120),
        )];
        let files = sources(&widgets);
        let header = file(&files, "Source/PluginEditor.h");
        assert!(header.contains("    juce::Slider Cutoff;\n"));
        assert!(header.contains("SliderAttachment> CutoffAttachment;"));
        assert!(!header.contains("class LevelMeter"));
        assert!(!header.contains("juce::Timer"));

        let editor = file(&files, "Source/PluginEditor.cpp");
        assert!(editor.contains("Cutoff.setBounds (10, 10, 120, 120);"));
        assert!(editor.contains("Cutoff.getProperties().set (\"styleIndex\", 0);"));
        assert!(editor.contains("setSize (400, 300);"));

        let processor = file(&files, "Source/PluginProcessor.cpp");
        assert!(processor.contains(
            "juce::AudioParameterFloat> (juce::ParameterID { \"Cutoff\", 1 }, \"Cutoff\", juce::NormalisableRange<float> (0.0f, 1.0f), 0.5f)"
        ));
        assert!(!processor.contains("handleMidiBindings"));
        assert!(processor.contains("juce::ignoreUnused (midiMessages);"));
    }

    #[test]
    fn test_rotary_fill_follows_style() {
        let mut hollow = WidgetDescriptor::placed(WidgetKind::Knob, "Drive", 0, 0);
        hollow.style.fill_knob = false;
        let widgets = vec![hollow, WidgetDescriptor::placed(WidgetKind::Knob, "Tone", 0, 0)];
        let editor = file(&sources(&widgets), "Source/PluginEditor.cpp").to_string();
        assert!(editor.contains(
            "Drive.setColour (juce::Slider::rotarySliderFillColourId, juce::Colour (0x00000000));"
        ));
        assert!(editor.contains(
            "Tone.setColour (juce::Slider::rotarySliderFillColourId, juce::Colour (0xff00d4ff));"
        ));
    }

    #[test]
    fn test_cc_glue_filters_by_channel() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Knob, "Cutoff", 0, 0).with_midi(74, 2),
            WidgetDescriptor::placed(WidgetKind::ToggleButton, "Bypass", 0, 0).with_midi(64, 1),
            WidgetDescriptor::placed(WidgetKind::Transport(TransportAction::Stop), "Stop", 0, 0)
                .with_midi(20, 1),
        ];
        let files = sources(&widgets);
        let processor = file(&files, "Source/PluginProcessor.cpp");
        assert!(processor.contains("if (channel == 2 && cc == 74)"));
        assert!(processor.contains("param->setValueNotifyingHost (value);"));
        assert!(processor.contains("param->setValueNotifyingHost (raw >= 64 ? 1.0f : 0.0f);"));
        assert!(processor.contains("if (channel == 1 && cc == 20 && raw >= 64)"));
        assert!(processor.contains("StopTriggered.store (true);"));

        let header = file(&files, "Source/PluginProcessor.h");
        assert!(header.contains("std::atomic<bool> StopTriggered { false };"));
        assert!(header.contains("void handleMidiBindings (const juce::MidiBuffer& midi);"));
    }

    #[test]
    fn test_helpers_only_when_used() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::VuMeter, "Level", 0, 0).with_midi(7, 1),
            WidgetDescriptor::placed(WidgetKind::Joystick, "Stick", 0, 0),
        ];
        let files = sources(&widgets);
        let header = file(&files, "Source/PluginEditor.h");
        assert!(header.contains("class LevelMeter"));
        assert!(header.contains("class XYPad"));
        assert!(header.contains("LevelMeter Level { LevelMeter::Style::Vu };"));
        assert!(header.contains("XYPad Stick { XYPad::Mode::Polar };"));
        assert!(header.contains("private juce::Timer"));

        let editor = file(&files, "Source/PluginEditor.cpp");
        assert!(editor.contains("// MIDI binding on display widget Level ignored"));
        assert!(editor.contains("Stick.attach (processorRef.apvts, \"StickRadius\", \"StickAngle\");"));
        assert!(editor.contains("Level.setLevel (currentLevel);"));
        assert!(editor.contains("startTimerHz (30);"));

        let processor = file(&files, "Source/PluginProcessor.h");
        assert!(processor.contains("std::atomic<float> outputLevel"));
        assert!(!processor.contains("handleMidiBindings"));
    }

    #[test]
    fn test_keyboard_channel_binding() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "Keys", 0, 0).with_midi(0, 3),
        ];
        let files = sources(&widgets);
        let editor = file(&files, "Source/PluginEditor.cpp");
        assert!(editor.contains("Keys.setMidiChannel (3);"));
        let processor = file(&files, "Source/PluginProcessor.h");
        assert!(processor.contains("juce::MidiKeyboardState keyboardState;"));
    }

    #[test]
    fn test_attachments_follow_members() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Slider, "B", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Slider, "A", 0, 0),
        ];
        let files = sources(&widgets);
        let header = file(&files, "Source/PluginEditor.h");
        let b = header.find("juce::Slider B;").unwrap();
        let a = header.find("juce::Slider A;").unwrap();
        let attachment = header.find("BAttachment;").unwrap();
        assert!(b < a && a < attachment);
    }

    #[test]
    fn test_widget_names_cannot_shadow_generated_symbols() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Knob, "p", 0, 0),
            WidgetDescriptor::placed(WidgetKind::VuMeter, "level", 100, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "MyPluginAudioProcessorEditor", 200, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "processor", 300, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "currentLevel", 400, 0),
        ];
        let files = sources(&widgets);
        let header = file(&files, "Source/PluginEditor.h");
        assert!(header.contains("    juce::Slider p;\n"));
        assert!(header.contains("    juce::Slider MyPluginAudioProcessorEditor_2;\n"));
        assert!(!header.contains("juce::Slider MyPluginAudioProcessorEditor;"));
        assert!(header.contains("    juce::Slider processor_2;\n"));
        assert!(header.contains("    juce::Slider currentLevel_2;\n"));

        let editor = file(&files, "Source/PluginEditor.cpp");
        assert!(editor.contains(
            "MyPluginAudioProcessorEditor::MyPluginAudioProcessorEditor (MyPluginAudioProcessor& processor)"
        ));
        assert!(editor.contains("p.setSliderStyle (juce::Slider::RotaryHorizontalVerticalDrag);"));
        assert!(editor.contains("const auto currentLevel = processorRef.outputLevel.load();"));
        assert!(editor.contains("level.setLevel (currentLevel);"));
    }
}
