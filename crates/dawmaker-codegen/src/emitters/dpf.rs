use dawmaker_model::{Color, ControlRole, Framework, TransportBehavior, WidgetKind};

use crate::context::{EmitContext, IndentStyle};
use crate::emitters::{caption, cc_bound, needs_signal};
use crate::naming::{cpp_float, cpp_string_literal, NamingRules};
use crate::plan::{ExportPlan, ParamKind, PlannedParameter, PlannedWidget, PluginIdentity};
use crate::traits::{ignored_binding_comment, SourceEmitter};

/// DPF source emitter: parameter enum, DSP class and a NanoVG UI.
pub struct DpfEmitter;

const RESERVED: &[&str] = &["OutputLevel", "Count"];

const OUTPUT_LEVEL: &str = "kParamOutputLevel";

/// First MIDI note of the on-screen keyboard and its white-key span.
const KEYBOARD_BASE_NOTE: u8 = 48;
const KEYBOARD_WHITE_KEYS: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Painter {
    Text,
    Knob,
    Slider { vertical: bool },
    Button,
    Meter,
    Scope,
    Pad,
    Keyboard,
}

impl Painter {
    fn of(kind: &WidgetKind) -> Self {
        match kind {
            WidgetKind::Knob => Painter::Knob,
            WidgetKind::Slider | WidgetKind::IndexedSlider { .. } => {
                Painter::Slider { vertical: false }
            }
            WidgetKind::VerticalFader | WidgetKind::PitchWheel => {
                Painter::Slider { vertical: true }
            }
            WidgetKind::Button | WidgetKind::ToggleButton | WidgetKind::ImageButton => {
                Painter::Button
            }
            WidgetKind::Label => Painter::Text,
            WidgetKind::Meter | WidgetKind::BasicMeter | WidgetKind::VuMeter | WidgetKind::LedMeter => {
                Painter::Meter
            }
            WidgetKind::Waveform | WidgetKind::AudioScope => Painter::Scope,
            WidgetKind::XyPad | WidgetKind::Joystick => Painter::Pad,
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Continuous => Painter::Knob,
                TransportBehavior::Latching | TransportBehavior::Momentary => Painter::Button,
            },
            WidgetKind::MidiKeyboard => Painter::Keyboard,
        }
    }

    /// Painter family, direction ignored
    fn family(self) -> Self {
        match self {
            Painter::Slider { .. } => Painter::Slider { vertical: false },
            other => other,
        }
    }
}

/// One host parameter slot of the DPF plugin.
enum Slot<'p, 'a> {
    Param(&'p PlannedParameter),
    Trigger(&'p PlannedWidget<'a>),
    OutputLevel,
}

impl Slot<'_, '_> {
    fn tag(&self) -> String {
        match self {
            Slot::Param(p) => format!("kParam{}", p.id),
            Slot::Trigger(w) => format!("kParam{}", w.ident),
            Slot::OutputLevel => OUTPUT_LEVEL.to_string(),
        }
    }
}

/// Parameter slots in widget order, output level last.
fn slots<'p, 'a>(plan: &'p ExportPlan<'a>) -> Vec<Slot<'p, 'a>> {
    let mut slots = Vec::new();
    for widget in &plan.widgets {
        if widget.role() == ControlRole::Momentary {
            slots.push(Slot::Trigger(widget));
        }
        slots.extend(plan.parameters_of(widget).iter().map(Slot::Param));
    }
    if plan.any_widget(|w| needs_signal(w.kind())) {
        slots.push(Slot::OutputLevel);
    }
    slots
}

fn dpf_color(c: Color) -> String {
    format!(
        "Color({}, {}, {}, {})",
        c.red(),
        c.green(),
        c.blue(),
        cpp_float(f32::from(c.alpha()) / 255.0)
    )
}

fn description(identity: &PluginIdentity) -> String {
    if identity.manufacturer.trim().is_empty() {
        identity.display_name.clone()
    } else {
        format!("{} by {}", identity.display_name, identity.manufacturer)
    }
}

fn param_tag(param: &PlannedParameter) -> String {
    format!("kParam{}", param.id)
}

/// Expression mapping a stored plain value into 0..1.
fn normalized(tag: &str, min: f32, max: f32) -> String {
    if max <= min {
        "0.0f".to_string()
    } else if min == 0.0 && max == 1.0 {
        format!("fValues[{tag}]")
    } else {
        format!(
            "(fValues[{tag}] - {}) / {}",
            cpp_float(min),
            cpp_float(max - min)
        )
    }
}

/// Expression mapping a 0..1 `value` into the plain range.
fn denormalized(value: &str, kind: &ParamKind) -> String {
    let (min, max) = kind.range();
    let plain = if min == 0.0 && max == 1.0 {
        value.to_string()
    } else if min == 0.0 {
        format!("{value} * {}", cpp_float(max))
    } else {
        format!("{} + {value} * {}", cpp_float(min), cpp_float(max - min))
    };
    match kind {
        ParamKind::Choice { .. } => format!("std::round({plain})"),
        ParamKind::Continuous { .. } | ParamKind::Toggle { .. } => plain,
    }
}

impl SourceEmitter for DpfEmitter {
    fn framework(&self) -> Framework {
        Framework::Dpf
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::spaces(4)
    }

    fn naming_rules(&self) -> NamingRules {
        NamingRules {
            reserved: RESERVED,
            companions: &[],
            class_suffixes: &[],
        }
    }

    fn emit_declaration(
        &self,
        widget: &PlannedWidget<'_>,
        _plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let ident = &widget.ident;
        ctx.line(&format!("Rectangle<double> f{ident}Bounds;"))
            + &ctx.line(&format!("Look f{ident}Look;"))
    }

    fn emit_setup(
        &self,
        widget: &PlannedWidget<'_>,
        _plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let ident = &widget.ident;
        let style = &widget.descriptor.style;
        let b = widget.descriptor.bounds;
        let builtin = style.builtin(widget.kind().style_slot());
        ctx.line(&format!(
            "f{ident}Bounds = Rectangle<double>({}, {}, {}, {});",
            b.x, b.y, b.width, b.height
        )) + &ctx.line(&format!(
            "f{ident}Look = {{ {}, {}, {}, {}, {}, {}, {}, {}, {} }};",
            dpf_color(style.knob_color),
            dpf_color(style.bg_color),
            dpf_color(style.border_color),
            dpf_color(style.text_color),
            cpp_float(style.border_width),
            cpp_float(style.corner_radius),
            builtin.draw_frame,
            style.fill_knob,
            widget.style_index
        ))
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
        let filter = format!("channel == {} && cc == {}", target.channel, target.cc);

        let block = match widget.role() {
            ControlRole::Keyboard => format!(
                "static constexpr uint8_t f{}Channel = {};",
                widget.ident,
                target.channel - 1
            ),
            ControlRole::Momentary => format!(
                "if ({filter} && raw >= 64)\n    fParams[kParam{}] = 1.0f;",
                widget.ident
            ),
            ControlRole::Toggle => {
                let param = plan.primary_parameter(widget)?;
                format!(
                    "if ({filter})\n    fParams[{}] = raw >= 64 ? 1.0f : 0.0f;",
                    param_tag(param)
                )
            }
            _ => {
                let param = plan.primary_parameter(widget)?;
                format!(
                    "if ({filter})\n    fParams[{}] = {};",
                    param_tag(param),
                    denormalized("value", &param.kind)
                )
            }
        };
        Some(ctx.lines(&block))
    }

    fn emit_sources(&self, plan: &ExportPlan<'_>) -> Vec<(String, String)> {
        let class = &plan.identity.class_name;
        let slots = slots(plan);
        vec![
            (format!("{class}Params.hpp"), self.params_header(&slots)),
            (format!("{class}Plugin.cpp"), self.plugin_source(plan, &slots)),
            (format!("{class}UI.cpp"), self.ui_source(plan)),
        ]
    }
}

impl DpfEmitter {
    fn params_header(&self, slots: &[Slot<'_, '_>]) -> String {
        let mut ctx = self.new_context();
        ctx.push_indent();
        let mut out = String::from("#pragma once\n\nenum Parameters {\n");
        for (i, slot) in slots.iter().enumerate() {
            let entry = if i == 0 {
                format!("{} = 0,", slot.tag())
            } else {
                format!("{},", slot.tag())
            };
            out.push_str(&ctx.line(&entry));
        }
        out.push_str(&ctx.line("kParamCount"));
        out.push_str("};\n");
        out
    }

    fn init_parameter(&self, slot: &Slot<'_, '_>, ctx: &mut EmitContext) -> String {
        let mut body = Vec::new();
        let (name, symbol, hints, range, default) = match slot {
            Slot::Param(p) => {
                let (min, max) = p.kind.range();
                let (hints, default) = match &p.kind {
                    ParamKind::Continuous { default, .. } => {
                        ("kParameterIsAutomatable".to_string(), *default)
                    }
                    ParamKind::Toggle { default } => (
                        "kParameterIsAutomatable | kParameterIsBoolean | kParameterIsInteger"
                            .to_string(),
                        if *default { 1.0 } else { 0.0 },
                    ),
                    ParamKind::Choice { default, .. } => (
                        "kParameterIsAutomatable | kParameterIsInteger".to_string(),
                        *default as f32,
                    ),
                };
                (p.label.clone(), p.id.clone(), hints, (min, max), default)
            }
            Slot::Trigger(w) => (
                caption(w).to_string(),
                w.ident.clone(),
                "kParameterIsAutomatable | kParameterIsTrigger".to_string(),
                (0.0, 1.0),
                0.0,
            ),
            Slot::OutputLevel => (
                "Output Level".to_string(),
                "OutputLevel".to_string(),
                "kParameterIsOutput".to_string(),
                (0.0, 1.0),
                0.0,
            ),
        };
        body.push(format!("parameter.hints = {hints};"));
        body.push(format!("parameter.name = {};", cpp_string_literal(&name)));
        body.push(format!("parameter.symbol = {};", cpp_string_literal(&symbol)));
        body.push(format!("parameter.ranges.min = {};", cpp_float(range.0)));
        body.push(format!("parameter.ranges.max = {};", cpp_float(range.1)));
        body.push(format!("parameter.ranges.def = {};", cpp_float(default)));
        if let Slot::Param(PlannedParameter {
            kind: ParamKind::Choice { options, .. },
            ..
        }) = slot
        {
            body.push(format!("parameter.enumValues.count = {};", options.len()));
            body.push("parameter.enumValues.restrictedMode = true;".to_string());
            body.push("{".to_string());
            body.push(format!(
                "    ParameterEnumerationValue* const values = new ParameterEnumerationValue[{}];",
                options.len()
            ));
            for (i, option) in options.iter().enumerate() {
                body.push(format!(
                    "    values[{i}].label = {};",
                    cpp_string_literal(option)
                ));
                body.push(format!("    values[{i}].value = {};", cpp_float(i as f32)));
            }
            body.push("    parameter.enumValues.values = values;".to_string());
            body.push("}".to_string());
        }
        body.push("break;".to_string());

        let mut out = ctx.line(&format!("case {}:", slot.tag()));
        ctx.push_indent();
        for line in &body {
            out.push_str(&ctx.line(line));
        }
        ctx.pop_indent();
        out
    }

    fn plugin_source(&self, plan: &ExportPlan<'_>, slots: &[Slot<'_, '_>]) -> String {
        let identity = &plan.identity;
        let class = format!("{}Plugin", identity.class_name);
        let mut ctx = self.new_context();

        let code: Vec<String> = identity
            .plugin_code
            .chars()
            .map(|c| format!("'{c}'"))
            .collect();

        ctx.set_indent_level(2);
        let defaults: String = slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Param(p) => {
                    let default = match &p.kind {
                        ParamKind::Continuous { default, .. } => *default,
                        ParamKind::Toggle { default } => f32::from(u8::from(*default)),
                        ParamKind::Choice { default, .. } => *default as f32,
                    };
                    (default != 0.0).then(|| {
                        ctx.line(&format!("fParams[{}] = {};", slot.tag(), cpp_float(default)))
                    })
                }
                Slot::Trigger(_) | Slot::OutputLevel => None,
            })
            .collect();

        ctx.set_indent_level(2);
        let init: String = slots
            .iter()
            .map(|slot| self.init_parameter(slot, &mut ctx))
            .collect();

        let bound: Vec<&PlannedWidget<'_>> = cc_bound(plan).collect();
        let midi = if bound.is_empty() {
            "        (void)midiEvents;\n        (void)midiEventCount;\n".to_string()
        } else {
            let mut midi = String::from(
                r#"        for (uint32_t i = 0; i < midiEventCount; ++i)
        {
            const MidiEvent& event = midiEvents[i];
            if (event.size != 3 || (event.data[0] & 0xF0) != 0xB0)
                continue;

            const int channel = (event.data[0] & 0x0F) + 1;
            const int cc = event.data[1];
            const int raw = event.data[2];
"#,
            );
            ctx.set_indent_level(3);
            if bound
                .iter()
                .any(|w| !matches!(w.role(), ControlRole::Toggle | ControlRole::Momentary))
            {
                midi.push_str(&ctx.line("const float value = raw / 127.0f;"));
            }
            for widget in &bound {
                if let Some(glue) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    midi.push('\n');
                    midi.push_str(&glue);
                }
            }
            midi.push_str("        }\n");
            midi
        };

        let level = if slots.iter().any(|s| matches!(s, Slot::OutputLevel)) {
            format!(
                r#"
        float peak = 0.0f;
        for (uint32_t c = 0; c < DISTRHO_PLUGIN_NUM_OUTPUTS; ++c)
            for (uint32_t f = 0; f < frames; ++f)
                peak = std::max(peak, std::abs(outputs[c][f]));
        fParams[{OUTPUT_LEVEL}] = std::min(peak, 1.0f);
"#
            )
        } else {
            String::new()
        };

        format!(
            r#"#include "DistrhoPlugin.hpp"
#include "{name}Params.hpp"

#include <algorithm>
#include <cmath>
#include <cstring>

START_NAMESPACE_DISTRHO

class {class} : public Plugin
{{
public:
    {class}()
        : Plugin(kParamCount, 0, 0)
    {{
        std::memset(fParams, 0, sizeof(fParams));
{defaults}    }}

protected:
    const char* getLabel() const override
    {{
        return {label};
    }}

    const char* getDescription() const override
    {{
        return {description};
    }}

    const char* getMaker() const override
    {{
        return {maker};
    }}

    const char* getLicense() const override
    {{
        return "ISC";
    }}

    uint32_t getVersion() const override
    {{
        return d_version({major}, {minor}, {patch});
    }}

    int64_t getUniqueId() const override
    {{
        return d_cconst({code});
    }}

    void initParameter(uint32_t index, Parameter& parameter) override
    {{
        switch (index)
        {{
{init}        }}
    }}

    float getParameterValue(uint32_t index) const override
    {{
        return index < kParamCount ? fParams[index] : 0.0f;
    }}

    void setParameterValue(uint32_t index, float value) override
    {{
        if (index < kParamCount)
            fParams[index] = value;
    }}

    void run(const float** inputs, float** outputs, uint32_t frames,
             const MidiEvent* midiEvents, uint32_t midiEventCount) override
    {{
{midi}
        for (uint32_t c = 0; c < DISTRHO_PLUGIN_NUM_OUTPUTS; ++c)
        {{
            if (outputs[c] != inputs[c])
                std::memcpy(outputs[c], inputs[c], sizeof(float) * frames);
        }}
{level}    }}

private:
    float fParams[kParamCount > 0 ? kParamCount : 1];

    DISTRHO_DECLARE_NON_COPYABLE_WITH_LEAK_DETECTOR({class})
}};

Plugin* createPlugin()
{{
    return new {class}();
}}

END_NAMESPACE_DISTRHO
"#,
            name = identity.class_name,
            label = cpp_string_literal(&identity.class_name),
            description = cpp_string_literal(&description(identity)),
            maker = cpp_string_literal(&identity.manufacturer),
            major = identity.version.major,
            minor = identity.version.minor,
            patch = identity.version.patch,
            code = code.join(", "),
        )
    }

    fn ui_source(&self, plan: &ExportPlan<'_>) -> String {
        let class = format!("{}UI", plan.identity.class_name);
        let mut ctx = self.new_context();

        let mut families: Vec<Painter> = plan
            .widgets
            .iter()
            .map(|w| Painter::of(w.kind()).family())
            .collect();
        families.sort();
        families.dedup();
        let keyboard = families.contains(&Painter::Keyboard);

        ctx.set_indent_level(2);
        let mut setup = String::new();
        for widget in &plan.widgets {
            setup.push_str(&self.emit_setup(widget, plan, &mut ctx));
            if widget.midi_ignored {
                if let Some(comment) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    setup.push_str(&comment);
                }
            }
        }

        let paint: String = plan
            .widgets
            .iter()
            .map(|w| ctx.line(&self.paint_call(w, plan)))
            .collect();

        let press: String = plan
            .widgets
            .iter()
            .filter_map(|w| self.press_handler(w, plan))
            .map(|block| ctx.lines(&block))
            .collect::<Vec<_>>()
            .join("\n");

        ctx.set_indent_level(2);
        let drag: String = plan
            .widgets
            .iter()
            .filter_map(|w| self.drag_case(w, plan).map(|c| (w, c)))
            .map(|(w, block)| {
                let mut case = ctx.line(&format!("case {}: // {}", w.position, w.ident));
                ctx.push_indent();
                case.push_str(&ctx.lines(&block));
                case.push_str(&ctx.line("break;"));
                ctx.pop_indent();
                case
            })
            .collect();

        ctx.set_indent_level(1);
        let mut members = String::new();
        for widget in &plan.widgets {
            members.push_str(&self.emit_declaration(widget, plan, &mut ctx));
        }
        for widget in plan.widgets.iter().filter(|w| w.role() == ControlRole::Keyboard) {
            if widget.midi.is_some() {
                if let Some(channel) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    members.push_str(&channel);
                }
            }
        }

        let mut painters = String::new();
        for family in &families {
            painters.push('\n');
            painters.push_str(painter_source(*family));
        }

        let release = if keyboard {
            "\n            if (fHeldNote >= 0)\n            {\n                sendNote(fHeldChannel, static_cast<uint8_t>(fHeldNote), 0);\n                fHeldNote = -1;\n            }\n"
        } else {
            ""
        };
        let keyboard_state = if keyboard {
            "    int fHeldNote = -1;\n    uint8_t fHeldChannel = 0;\n"
        } else {
            ""
        };

        format!(
            r#"#include "DistrhoUI.hpp"
#include "{name}Params.hpp"

#include <algorithm>
#include <cmath>
#include <cstring>

START_NAMESPACE_DISTRHO

struct Look {{
    Color fg, bg, border, text;
    float borderWidth;
    float radius;
    bool frame;
    bool fill;
    int style;
}};

class {class} : public UI
{{
public:
    {class}()
        : UI({width}, {height})
    {{
        std::memset(fValues, 0, sizeof(fValues));
        loadSharedResources();

{setup}    }}

protected:
    void parameterChanged(uint32_t index, float value) override
    {{
        if (index < kParamCount)
        {{
            fValues[index] = value;
            repaint();
        }}
    }}

    void onNanoDisplay() override
    {{
{paint}    }}

    bool onMouse(const MouseEvent& ev) override
    {{
        if (ev.button != 1)
            return false;

        if (! ev.press)
        {{{release}
            for (int& param : fDragParams)
            {{
                if (param >= 0)
                    editParameter(static_cast<uint32_t>(param), false);
                param = -1;
            }}
            fDrag = -1;
            return true;
        }}

{press}
        return false;
    }}

    bool onMotion(const MotionEvent& ev) override
    {{
        if (fDrag < 0)
            return false;
        dragTo(ev.pos);
        return true;
    }}

private:
    void beginDrag(int widget, int first, int second = -1)
    {{
        fDrag = widget;
        fDragParams[0] = first;
        fDragParams[1] = second;
        for (int param : fDragParams)
            if (param >= 0)
                editParameter(static_cast<uint32_t>(param), true);
    }}

    void dragTo(const Point<double>& pos)
    {{
        switch (fDrag)
        {{
{drag}        default:
            break;
        }}
    }}

    void setPlain(uint32_t index, float min, float max, float fraction, bool integer = false)
    {{
        float value = min + std::min(std::max(fraction, 0.0f), 1.0f) * (max - min);
        if (integer)
            value = std::round(value);
        fValues[index] = value;
        setParameterValue(index, value);
        repaint();
    }}

    static float fractionX(const Rectangle<double>& b, const Point<double>& pos)
    {{
        return static_cast<float>((pos.getX() - b.getX()) / b.getWidth());
    }}

    static float fractionY(const Rectangle<double>& b, const Point<double>& pos)
    {{
        return static_cast<float>((b.getY() + b.getHeight() - pos.getY()) / b.getHeight());
    }}

    void paintFrame(const Rectangle<double>& b, const Look& look)
    {{
        beginPath();
        roundedRect(b.getX(), b.getY(), b.getWidth(), b.getHeight(), look.radius);
        fillColor(look.bg);
        fill();
        if (look.frame && look.borderWidth > 0.0f)
        {{
            strokeColor(look.border);
            strokeWidth(look.borderWidth);
            stroke();
        }}
    }}
{painters}
    float fValues[kParamCount > 0 ? kParamCount : 1];
    int fDrag = -1;
    int fDragParams[2] = {{ -1, -1 }};
{keyboard_state}
{members}
    DISTRHO_DECLARE_NON_COPYABLE_WITH_LEAK_DETECTOR({class})
}};

UI* createUI()
{{
    return new {class}();
}}

END_NAMESPACE_DISTRHO
"#,
            name = plan.identity.class_name,
            width = plan.editor_width,
            height = plan.editor_height,
        )
    }

    fn paint_call(&self, widget: &PlannedWidget<'_>, plan: &ExportPlan<'_>) -> String {
        let ident = &widget.ident;
        let args = format!("f{ident}Bounds, f{ident}Look");
        let params = plan.parameters_of(widget);
        let value_of = |p: &PlannedParameter| {
            let (min, max) = p.kind.range();
            normalized(&param_tag(p), min, max)
        };
        match Painter::of(widget.kind()) {
            Painter::Text => format!("paintText({args}, {});", cpp_string_literal(widget.name())),
            Painter::Knob => format!(
                "paintKnob({args}, {});",
                params.first().map(value_of).unwrap_or_else(|| "0.0f".into())
            ),
            Painter::Slider { vertical } => format!(
                "paintSlider({args}, {}, {vertical});",
                params.first().map(value_of).unwrap_or_else(|| "0.0f".into())
            ),
            Painter::Button => {
                let on = match (widget.role(), params.first()) {
                    (ControlRole::Momentary, _) => format!("fValues[kParam{ident}] > 0.5f"),
                    (_, Some(p)) => format!("fValues[{}] > 0.5f", param_tag(p)),
                    (_, None) => "false".to_string(),
                };
                format!(
                    "paintButton({args}, {on}, {});",
                    cpp_string_literal(caption(widget))
                )
            }
            Painter::Meter => format!("paintMeter({args}, fValues[{OUTPUT_LEVEL}]);"),
            Painter::Scope => format!("paintScope({args}, fValues[{OUTPUT_LEVEL}]);"),
            Painter::Pad => {
                let values: Vec<String> = params.iter().map(value_of).collect();
                format!("paintPad({args}, {});", values.join(", "))
            }
            Painter::Keyboard => format!("paintKeyboard({args});"),
        }
    }

    fn press_handler(&self, widget: &PlannedWidget<'_>, plan: &ExportPlan<'_>) -> Option<String> {
        let ident = &widget.ident;
        let params = plan.parameters_of(widget);
        let action = match widget.role() {
            ControlRole::Display => return None,
            ControlRole::Momentary => {
                format!("setParameterValue(kParam{ident}, 1.0f);\nrepaint();")
            }
            ControlRole::Toggle => {
                let tag = param_tag(params.first()?);
                format!(
                    "fValues[{tag}] = fValues[{tag}] > 0.5f ? 0.0f : 1.0f;\nsetParameterValue({tag}, fValues[{tag}]);\nrepaint();"
                )
            }
            ControlRole::TwoAxis { .. } => {
                let tags: Vec<String> = params.iter().map(param_tag).collect();
                format!(
                    "beginDrag({}, {});\ndragTo(ev.pos);",
                    widget.position,
                    tags.join(", ")
                )
            }
            ControlRole::Continuous { .. } | ControlRole::Choice => format!(
                "beginDrag({}, {});\ndragTo(ev.pos);",
                widget.position,
                param_tag(params.first()?)
            ),
            ControlRole::Keyboard => {
                let channel = if widget.midi.is_some() {
                    format!("f{ident}Channel")
                } else {
                    "0".to_string()
                };
                format!(
                    r#"static constexpr int kWhiteOffsets[7] = {{ 0, 2, 4, 5, 7, 9, 11 }};
const int key = std::min(std::max(static_cast<int>(fractionX(f{ident}Bounds, ev.pos) * {KEYBOARD_WHITE_KEYS}), 0), {last});
fHeldNote = {KEYBOARD_BASE_NOTE} + (key / 7) * 12 + kWhiteOffsets[key % 7];
fHeldChannel = {channel};
sendNote(fHeldChannel, static_cast<uint8_t>(fHeldNote), 100);"#,
                    last = KEYBOARD_WHITE_KEYS - 1
                )
            }
        };
        let mut block = format!("if (f{ident}Bounds.contains(ev.pos))\n{{\n");
        for line in action.lines() {
            block.push_str("    ");
            block.push_str(line);
            block.push('\n');
        }
        block.push_str("    return true;\n}");
        Some(block)
    }

    fn drag_case(&self, widget: &PlannedWidget<'_>, plan: &ExportPlan<'_>) -> Option<String> {
        let ident = &widget.ident;
        let params = plan.parameters_of(widget);
        let set = |p: &PlannedParameter, fraction: &str| {
            let (min, max) = p.kind.range();
            let integer = if matches!(p.kind, ParamKind::Choice { .. }) {
                ", true"
            } else {
                ""
            };
            format!(
                "setPlain({}, {}, {}, {fraction}(f{ident}Bounds, pos){integer});",
                param_tag(p),
                cpp_float(min),
                cpp_float(max)
            )
        };
        match widget.role() {
            ControlRole::TwoAxis { .. } => {
                let [x, y] = params else { return None };
                Some(format!("{}\n{}", set(x, "fractionX"), set(y, "fractionY")))
            }
            ControlRole::Continuous { .. } | ControlRole::Choice => {
                let horizontal = matches!(
                    Painter::of(widget.kind()),
                    Painter::Slider { vertical: false }
                );
                let fraction = if horizontal { "fractionX" } else { "fractionY" };
                Some(set(params.first()?, fraction))
            }
            ControlRole::Toggle
            | ControlRole::Momentary
            | ControlRole::Display
            | ControlRole::Keyboard => None,
        }
    }
}

fn painter_source(family: Painter) -> &'static str {
    match family {
        Painter::Text => PAINT_TEXT,
        Painter::Knob => PAINT_KNOB,
        Painter::Slider { .. } => PAINT_SLIDER,
        Painter::Button => PAINT_BUTTON,
        Painter::Meter => PAINT_METER,
        Painter::Scope => PAINT_SCOPE,
        Painter::Pad => PAINT_PAD,
        Painter::Keyboard => PAINT_KEYBOARD,
    }
}

const PAINT_TEXT: &str = r#"    void paintText(const Rectangle<double>& b, const Look& look, const char* label)
    {
        paintFrame(b, look);
        fontSize(14.0f);
        fillColor(look.text);
        textAlign(ALIGN_CENTER | ALIGN_MIDDLE);
        text(b.getX() + b.getWidth() / 2, b.getY() + b.getHeight() / 2, label, nullptr);
    }
"#;

const PAINT_KNOB: &str = r#"    void paintKnob(const Rectangle<double>& b, const Look& look, float value)
    {
        paintFrame(b, look);
        const float cx = b.getX() + b.getWidth() / 2;
        const float cy = b.getY() + b.getHeight() / 2;
        const float radius = std::min(b.getWidth(), b.getHeight()) / 2 - 6.0f;
        const float start = 0.75f * M_PI;
        const float end = start + 1.5f * M_PI * std::min(std::max(value, 0.0f), 1.0f);
        if (look.fill)
        {
            beginPath();
            circle(cx, cy, radius - 4.0f);
            fillColor(look.fg.withAlpha(0.35f));
            fill();
        }
        beginPath();
        arc(cx, cy, radius, start, end, CW);
        strokeColor(look.fg);
        strokeWidth(4.0f);
        stroke();
    }
"#;

const PAINT_SLIDER: &str = r#"    void paintSlider(const Rectangle<double>& b, const Look& look, float value, bool vertical)
    {
        paintFrame(b, look);
        const float v = std::min(std::max(value, 0.0f), 1.0f);
        beginPath();
        if (vertical)
            rect(b.getX(), b.getY() + b.getHeight() * (1.0f - v), b.getWidth(), b.getHeight() * v);
        else
            rect(b.getX(), b.getY(), b.getWidth() * v, b.getHeight());
        fillColor(look.fg);
        fill();
    }
"#;

const PAINT_BUTTON: &str = r#"    void paintButton(const Rectangle<double>& b, const Look& look, bool on, const char* label)
    {
        paintFrame(b, look);
        if (on)
        {
            beginPath();
            roundedRect(b.getX() + 2, b.getY() + 2, b.getWidth() - 4, b.getHeight() - 4, look.radius);
            fillColor(look.fg);
            fill();
        }
        fontSize(13.0f);
        fillColor(look.text);
        textAlign(ALIGN_CENTER | ALIGN_MIDDLE);
        text(b.getX() + b.getWidth() / 2, b.getY() + b.getHeight() / 2, label, nullptr);
    }
"#;

const PAINT_METER: &str = r#"    void paintMeter(const Rectangle<double>& b, const Look& look, float level)
    {
        paintFrame(b, look);
        const float v = std::min(std::max(level, 0.0f), 1.0f);
        beginPath();
        if (b.getHeight() >= b.getWidth())
            rect(b.getX(), b.getY() + b.getHeight() * (1.0f - v), b.getWidth(), b.getHeight() * v);
        else
            rect(b.getX(), b.getY(), b.getWidth() * v, b.getHeight());
        fillColor(look.fg);
        fill();
    }
"#;

const PAINT_SCOPE: &str = r#"    void paintScope(const Rectangle<double>& b, const Look& look, float level)
    {
        paintFrame(b, look);
        const float mid = b.getY() + b.getHeight() / 2;
        const float amplitude = std::min(std::max(level, 0.0f), 1.0f) * b.getHeight() / 2;
        beginPath();
        moveTo(b.getX(), mid);
        for (int i = 1; i <= 64; ++i)
        {
            const float t = i / 64.0f;
            lineTo(b.getX() + b.getWidth() * t, mid - amplitude * std::sin(t * 8.0f * M_PI));
        }
        strokeColor(look.fg);
        strokeWidth(1.5f);
        stroke();
    }
"#;

const PAINT_PAD: &str = r#"    void paintPad(const Rectangle<double>& b, const Look& look, float x, float y)
    {
        paintFrame(b, look);
        beginPath();
        circle(b.getX() + b.getWidth() * x, b.getY() + b.getHeight() * (1.0f - y), 6.0f);
        fillColor(look.fg);
        fill();
    }
"#;

const PAINT_KEYBOARD: &str = r#"    void paintKeyboard(const Rectangle<double>& b, const Look& look)
    {
        paintFrame(b, look);
        const float keyWidth = b.getWidth() / 14.0f;
        for (int i = 0; i < 14; ++i)
        {
            beginPath();
            rect(b.getX() + i * keyWidth + 1, b.getY() + 1, keyWidth - 2, b.getHeight() - 2);
            fillColor(Color(255, 255, 255));
            fill();
        }
        strokeColor(look.border);
    }
"#;
