use dawmaker_model::{Color, ControlRole, Framework, TransportBehavior, WidgetKind};

use crate::context::{EmitContext, IndentStyle};
use crate::emitters::{caption, cc_bound, needs_signal};
use crate::naming::{cpp_float, cpp_string_literal, NamingRules};
use crate::plan::{ExportPlan, ParamKind, PlannedWidget};
use crate::traits::{ignored_binding_comment, SourceEmitter};

/// iPlug2 source emitter: one plugin class with an IGraphics layout function.
pub struct Iplug2Emitter;

const RESERVED: &[&str] = &["pGraphics", "DEFAULT_STYLE"];

const COMPANIONS: &[&str] = &["Style"];

const FILMSTRIP_FRAMES: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Knob,
    Slider { vertical: bool },
    TabSwitch,
    Button,
    Toggle,
    Text,
    Meter,
    Scope,
    XyPad,
    Keyboard,
}

impl Control {
    fn of(kind: &WidgetKind) -> Self {
        match kind {
            WidgetKind::Knob => Control::Knob,
            WidgetKind::Slider => Control::Slider { vertical: false },
            WidgetKind::VerticalFader | WidgetKind::PitchWheel => {
                Control::Slider { vertical: true }
            }
            WidgetKind::IndexedSlider { .. } => Control::TabSwitch,
            WidgetKind::Button => Control::Button,
            WidgetKind::ToggleButton | WidgetKind::ImageButton => Control::Toggle,
            WidgetKind::Label => Control::Text,
            WidgetKind::Meter | WidgetKind::BasicMeter | WidgetKind::VuMeter | WidgetKind::LedMeter => {
                Control::Meter
            }
            WidgetKind::Waveform | WidgetKind::AudioScope => Control::Scope,
            WidgetKind::XyPad | WidgetKind::Joystick => Control::XyPad,
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Latching => Control::Toggle,
                TransportBehavior::Momentary => Control::Button,
                TransportBehavior::Continuous => Control::Knob,
            },
            WidgetKind::MidiKeyboard => Control::Keyboard,
        }
    }
}

fn icolor(c: Color) -> String {
    format!("IColor({}, {}, {}, {})", c.alpha(), c.red(), c.green(), c.blue())
}

fn ctrl_tag(widget: &PlannedWidget<'_>) -> String {
    format!("kCtrlTag{}", widget.ident)
}

fn msg_tag(widget: &PlannedWidget<'_>) -> String {
    format!("kMsgTag{}", widget.ident)
}

fn sender(widget: &PlannedWidget<'_>) -> Option<String> {
    match Control::of(widget.kind()) {
        Control::Meter => Some(format!("IPeakSender<2> m{}Sender;", widget.ident)),
        Control::Scope => Some(format!("IBufferSender<2> m{}Sender;", widget.ident)),
        _ => None,
    }
}

fn param_tag(id: &str) -> String {
    format!("kParam{id}")
}

fn enum_block(name: &str, entries: &[String], count: &str) -> String {
    let mut out = format!("enum {name}\n{{\n");
    for (i, entry) in entries.iter().enumerate() {
        let line = if i == 0 {
            format!("  {entry} = 0,")
        } else {
            format!("  {entry},")
        };
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!("  {count}\n}};\n"));
    out
}

impl SourceEmitter for Iplug2Emitter {
    fn framework(&self) -> Framework {
        Framework::Iplug2
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::spaces(2)
    }

    fn naming_rules(&self) -> NamingRules {
        NamingRules {
            reserved: RESERVED,
            companions: COMPANIONS,
            class_suffixes: &[],
        }
    }

    /// The control tag entry; controls themselves are created in the layout function.
    fn emit_declaration(
        &self,
        widget: &PlannedWidget<'_>,
        _plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        ctx.line(&format!("{},", ctrl_tag(widget)))
    }

    fn emit_setup(
        &self,
        widget: &PlannedWidget<'_>,
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let ident = &widget.ident;
        let style = &widget.descriptor.style;
        let builtin = widget.descriptor.style.builtin(widget.kind().style_slot());
        let b = widget.descriptor.bounds;
        let rect = format!("IRECT({}, {}, {}, {})", b.x, b.y, b.right(), b.bottom());
        let label = cpp_string_literal(caption(widget));
        let style_name = format!("{ident}Style");
        let tag = ctrl_tag(widget);
        let params: Vec<String> = plan
            .parameters_of(widget)
            .iter()
            .map(|p| param_tag(&p.id))
            .collect();
        let param = params.first().cloned().unwrap_or_else(|| "kNoParameter".to_string());
        let control = Control::of(widget.kind());

        let mut lines = Vec::new();
        if control != Control::Text && control != Control::Keyboard {
            lines.push(format!("const IVStyle {style_name} = DEFAULT_STYLE"));
            lines.push(format!("  .WithColor(kFG, {})", icolor(style.knob_color)));
            lines.push(format!("  .WithColor(kBG, {})", icolor(style.bg_color)));
            lines.push(format!("  .WithColor(kFR, {})", icolor(style.border_color)));
            lines.push(format!(
                "  .WithLabelText(DEFAULT_LABEL_TEXT.WithFGColor({}))",
                icolor(style.text_color)
            ));
            lines.push(format!("  .WithRoundness({})", cpp_float(builtin.roundness)));
            lines.push(format!("  .WithFrameThickness({})", cpp_float(style.border_width)));
            lines.push(format!("  .WithDrawFrame({})", builtin.draw_frame));
            lines.push(format!("  .WithDrawShadows({})", builtin.draw_shadows));
            lines.push(format!("  .WithEmboss({});", builtin.emboss));
        }

        let filmstrip = style.filmstrip();
        let attach = match control {
            Control::Knob => match filmstrip {
                Some(path) => format!(
                    "new IBKnobControl({rect}, pGraphics->LoadBitmap({}, {FILMSTRIP_FRAMES}), {param})",
                    cpp_string_literal(path)
                ),
                None => format!("new IVKnobControl({rect}, {param}, {label}, {style_name})"),
            },
            Control::Slider { vertical } => {
                let direction = if vertical { "Vertical" } else { "Horizontal" };
                format!(
                    "new IVSliderControl({rect}, {param}, {label}, {style_name}, false, EDirection::{direction})"
                )
            }
            Control::TabSwitch => {
                let options = match plan.primary_parameter(widget).map(|p| &p.kind) {
                    Some(ParamKind::Choice { options, .. }) => options
                        .iter()
                        .map(|o| cpp_string_literal(o))
                        .collect::<Vec<_>>()
                        .join(", "),
                    _ => String::new(),
                };
                format!("new IVTabSwitchControl({rect}, {param}, {{{options}}}, {label}, {style_name})")
            }
            Control::Button => format!(
                "new IVButtonControl({rect}, [this](IControl* pCaller) {{ SplashClickActionFunc(pCaller); SendArbitraryMsgFromUI({}); }}, {label}, {style_name})",
                msg_tag(widget)
            ),
            Control::Toggle => match filmstrip {
                Some(path) => format!(
                    "new IBSwitchControl({rect}, pGraphics->LoadBitmap({}, 2), {param})",
                    cpp_string_literal(path)
                ),
                None => format!("new IVToggleControl({rect}, {param}, {label}, {style_name})"),
            },
            Control::Text => format!(
                "new ITextControl({rect}, {}, DEFAULT_TEXT.WithFGColor({}), {})",
                cpp_string_literal(widget.name()),
                icolor(style.text_color),
                icolor(style.bg_color)
            ),
            Control::Meter => format!("new IVMeterControl<2>({rect}, {label}, {style_name})"),
            Control::Scope => format!("new IVScopeControl<2>({rect}, {label}, {style_name})"),
            Control::XyPad => format!(
                "new IVXYPadControl({rect}, {{{}}}, {label}, {style_name})",
                params.join(", ")
            ),
            Control::Keyboard => format!("new IVKeyboardControl({rect})"),
        };
        lines.push(format!("pGraphics->AttachControl({attach}, {tag});"));

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
        let filter = format!("channel == {} && cc == {}", target.channel, target.cc);

        let block = match widget.role() {
            ControlRole::Keyboard => format!(
                "if (msg.Channel() + 1 == {} && (status == IMidiMsg::kNoteOn || status == IMidiMsg::kNoteOff))\n  TransmitMidiMsgFromProcessor(msg);",
                target.channel
            ),
            ControlRole::Momentary => {
                format!("if ({filter} && raw >= 64)\n  mLastTrigger = {};", msg_tag(widget))
            }
            role => {
                let param = param_tag(&plan.primary_parameter(widget)?.id);
                let value = if role == ControlRole::Toggle {
                    "raw >= 64 ? 1. : 0."
                } else {
                    "value"
                };
                format!(
                    "if ({filter})\n{{\n  GetParam({param})->SetNormalized({value});\n  SendParameterValueFromAPI({param}, {value}, true);\n}}"
                )
            }
        };
        Some(ctx.lines(&block))
    }

    fn emit_sources(&self, plan: &ExportPlan<'_>) -> Vec<(String, String)> {
        let class = &plan.identity.class_name;
        vec![
            (format!("{class}.h"), self.header(plan)),
            (format!("{class}.cpp"), self.source(plan)),
        ]
    }
}

impl Iplug2Emitter {
    fn header(&self, plan: &ExportPlan<'_>) -> String {
        let class = &plan.identity.class_name;
        let mut ctx = self.new_context();
        let momentary: Vec<&PlannedWidget<'_>> = plan
            .widgets
            .iter()
            .filter(|w| w.role() == ControlRole::Momentary)
            .collect();
        let senders: Vec<String> = plan.widgets.iter().filter_map(sender).collect();

        let mut out = String::from("#pragma once\n\n#include \"IPlug_include_in_plug_hdr.h\"\n");
        if !senders.is_empty() {
            out.push_str("#include \"ISender.h\"\n");
        }
        out.push_str("#include <atomic>\n\n");
        out.push_str("const int kNumPresets = 1;\n");
        out.push_str(&format!(
            "constexpr int kEditorWidth = {};\nconstexpr int kEditorHeight = {};\n\n",
            plan.editor_width, plan.editor_height
        ));

        let params: Vec<String> = plan.parameters.iter().map(|p| param_tag(&p.id)).collect();
        out.push_str(&enum_block("EParams", &params, "kNumParams"));
        out.push('\n');

        // ctrl tags: one per widget, via the declaration hook
        out.push_str("enum ECtrlTags\n{\n");
        ctx.push_indent();
        for (i, widget) in plan.widgets.iter().enumerate() {
            let mut entry = self.emit_declaration(widget, plan, &mut ctx);
            if i == 0 {
                entry = entry.replacen(',', " = 0,", 1);
            }
            out.push_str(&entry);
        }
        ctx.pop_indent();
        out.push_str("  kNumCtrlTags\n};\n");

        if !momentary.is_empty() {
            let tags: Vec<String> = momentary.iter().map(|w| msg_tag(w)).collect();
            out.push('\n');
            out.push_str(&enum_block("EMsgTags", &tags, "kNumMsgTags"));
        }

        out.push_str(&format!(
            r#"
using namespace iplug;
using namespace igraphics;

class {class} final : public Plugin
{{
public:
  {class}(const InstanceInfo& info);

#if IPLUG_DSP
  void ProcessBlock(sample** inputs, sample** outputs, int nFrames) override;
  void ProcessMidiMsg(const IMidiMsg& msg) override;
"#
        ));
        if !senders.is_empty() {
            out.push_str("  void OnIdle() override;\n");
        }
        if !momentary.is_empty() {
            out.push_str(
                "  bool OnMessage(int msgTag, int ctrlTag, int dataSize, const void* pData) override;\n",
            );
        }
        if !senders.is_empty() || !momentary.is_empty() {
            out.push_str("\nprivate:\n");
            for s in &senders {
                out.push_str(&format!("  {s}\n"));
            }
            if !momentary.is_empty() {
                out.push_str("  std::atomic<int> mLastTrigger { -1 };\n");
            }
        }
        out.push_str("#endif\n};\n");
        out
    }

    fn source(&self, plan: &ExportPlan<'_>) -> String {
        let class = &plan.identity.class_name;
        let mut ctx = self.new_context();
        ctx.push_indent();

        let mut out = format!(
            r#"#include "{class}.h"
#include "IPlug_include_in_plug_src.h"
#include "IControls.h"

{class}::{class}(const InstanceInfo& info)
: iplug::Plugin(info, MakeConfig(kNumParams, kNumPresets))
{{
"#
        );
        for param in &plan.parameters {
            let tag = param_tag(&param.id);
            let name = cpp_string_literal(&param.label);
            let init = match &param.kind {
                ParamKind::Continuous { min, max, default } => format!(
                    "GetParam({tag})->InitDouble({name}, {default:?}, {min:?}, {max:?}, 0.01);"
                ),
                ParamKind::Toggle { default } => {
                    format!("GetParam({tag})->InitBool({name}, {default});")
                }
                ParamKind::Choice { options, default } => {
                    let options: Vec<String> =
                        options.iter().map(|o| cpp_string_literal(o)).collect();
                    format!(
                        "GetParam({tag})->InitEnum({name}, {default}, {{{}}});",
                        options.join(", ")
                    )
                }
            };
            out.push_str(&ctx.line(&init));
        }
        if !plan.parameters.is_empty() {
            out.push('\n');
        }

        out.push_str(
            r#"#if IPLUG_EDITOR
  mMakeGraphicsFunc = [&]() {
    return MakeGraphics(*this, kEditorWidth, kEditorHeight, PLUG_FPS, GetScaleForScreen(kEditorWidth, kEditorHeight));
  };

  mLayoutFunc = [&](IGraphics* pGraphics) {
    pGraphics->AttachCornerResizer(EUIResizerMode::Scale, false);
    pGraphics->AttachPanelBackground(COLOR_GRAY);
    pGraphics->LoadFont("Roboto-Regular", ROBOTO_FN);
"#,
        );
        ctx.push_indent();
        for widget in &plan.widgets {
            out.push('\n');
            out.push_str(&self.emit_setup(widget, plan, &mut ctx));
            if widget.midi_ignored {
                if let Some(comment) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    out.push_str(&comment);
                }
            }
        }
        ctx.pop_indent();
        out.push_str("  };\n#endif\n}\n\n#if IPLUG_DSP\n");

        // audio
        out.push_str(&format!(
            r#"void {class}::ProcessBlock(sample** inputs, sample** outputs, int nFrames)
{{
  const int nChans = NOutChansConnected();
  for (int s = 0; s < nFrames; s++)
    for (int c = 0; c < nChans; c++)
      outputs[c][s] = inputs[c][s];
"#
        ));
        let signalled: Vec<&PlannedWidget<'_>> =
            plan.widgets.iter().filter(|w| needs_signal(w.kind())).collect();
        if !signalled.is_empty() {
            out.push('\n');
        }
        for widget in &signalled {
            out.push_str(&ctx.line(&format!(
                "m{}Sender.ProcessBlock(outputs, nFrames, {});",
                widget.ident,
                ctrl_tag(widget)
            )));
        }
        out.push_str("}\n\n");

        // midi
        out.push_str(&format!(
            "void {class}::ProcessMidiMsg(const IMidiMsg& msg)\n{{\n  TRACE;\n"
        ));
        let keyboards: Vec<&PlannedWidget<'_>> = plan
            .widgets
            .iter()
            .filter(|w| w.role() == ControlRole::Keyboard)
            .collect();
        if !keyboards.is_empty() {
            out.push_str("\n  const int status = msg.StatusMsg();\n");
            if keyboards.iter().all(|w| w.midi.is_none()) {
                out.push_str(
                    "  if (status == IMidiMsg::kNoteOn || status == IMidiMsg::kNoteOff)\n    TransmitMidiMsgFromProcessor(msg);\n",
                );
            }
            for widget in &keyboards {
                if widget.midi.is_some() {
                    if let Some(glue) = self.emit_midi_binding(widget, plan, &mut ctx) {
                        out.push_str(&glue);
                    }
                }
            }
        }
        let bound: Vec<&PlannedWidget<'_>> = cc_bound(plan).collect();
        if !bound.is_empty() {
            out.push_str(
                r#"
  if (msg.StatusMsg() == IMidiMsg::kControlChange)
  {
    const int channel = msg.Channel() + 1;
    const int cc = static_cast<int>(msg.mData1);
    const int raw = msg.mData2;
"#,
            );
            ctx.push_indent();
            let needs_value = bound.iter().any(|w| {
                !matches!(w.role(), ControlRole::Toggle | ControlRole::Momentary)
            });
            if needs_value {
                out.push_str(&ctx.line("const double value = raw / 127.;"));
            }
            for widget in &bound {
                if let Some(glue) = self.emit_midi_binding(widget, plan, &mut ctx) {
                    out.push('\n');
                    out.push_str(&glue);
                }
            }
            ctx.pop_indent();
            out.push_str("  }\n");
        }
        out.push_str("\n  SendMidiMsg(msg);\n}\n");

        if !signalled.is_empty() {
            out.push_str(&format!("\nvoid {class}::OnIdle()\n{{\n"));
            for widget in &signalled {
                out.push_str(&ctx.line(&format!("m{}Sender.TransmitData(*this);", widget.ident)));
            }
            out.push_str("}\n");
        }

        if plan.any_widget(|w| w.role() == ControlRole::Momentary) {
            out.push_str(&format!(
                r#"
bool {class}::OnMessage(int msgTag, int ctrlTag, int dataSize, const void* pData)
{{
  if (msgTag >= 0 && msgTag < kNumMsgTags)
  {{
    mLastTrigger = msgTag;
    return true;
  }}
  return false;
}}
"#
            ));
        }
        out.push_str("#endif\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::{Bounds, ProjectMeta, TransportAction, WidgetDescriptor, WidgetStyle};

    fn sources(widgets: &[WidgetDescriptor]) -> (String, String) {
        let meta = ProjectMeta::new("Delay Box", "Acme", Framework::Iplug2);
        let plan = ExportPlan::build(widgets, &meta, Iplug2Emitter.naming_rules()).unwrap();
        let files = Iplug2Emitter.emit_sources(&plan);
        assert_eq!(files[0].0, "DelayBox.h");
        assert_eq!(files[1].0, "DelayBox.cpp");
        (files[0].1.clone(), files[1].1.clone())
    }

    #[test]
    fn test_enums_follow_insertion_order() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Label, "Title", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Knob, "Time", 0, 0),
            WidgetDescriptor::placed(WidgetKind::XyPad, "Pad", 0, 0),
        ];
        let (header, _) = sources(&widgets);
        assert!(header.contains(
            "enum EParams\n{\n  kParamTime = 0,\n  kParamPadX,\n  kParamPadY,\n  kNumParams\n};"
        ));
        assert!(header.contains(
            "enum ECtrlTags\n{\n  kCtrlTagTitle = 0,\n  kCtrlTagTime,\n  kCtrlTagPad,\n  kNumCtrlTags\n};"
        ));
        assert!(!header.contains("EMsgTags"));
    }

    #[test]
    fn test_control_construction() {
        let widgets = vec![
            WidgetDescriptor::new(WidgetKind::Knob, "Time", Bounds::new(10, 20, 80, 80)),
            WidgetDescriptor::placed(WidgetKind::XyPad, "Pad", 0, 0),
            WidgetDescriptor::placed(WidgetKind::IndexedSlider { options: vec!["A".into(), "B".into()] }, "Mode", 0, 0),
        ];
        let (_, source) = sources(&widgets);
        assert!(source.contains(
            "pGraphics->AttachControl(new IVKnobControl(IRECT(10, 20, 90, 100), kParamTime, \"Time\", TimeStyle), kCtrlTagTime);"
        ));
        assert!(source.contains("{kParamPadX, kParamPadY}"));
        assert!(source.contains("GetParam(kParamTime)->InitDouble(\"Time\", 0.5, 0.0, 1.0, 0.01);"));
        assert!(source.contains("GetParam(kParamMode)->InitEnum(\"Mode\", 0, {\"A\", \"B\"});"));
        assert!(source.contains(".WithColor(kFG, IColor(255, 0, 212, 255))"));
    }

    #[test]
    fn test_filmstrip_uses_bitmap_control() {
        let style = WidgetStyle {
            filmstrip_path: Some("knob.png".into()),
            ..WidgetStyle::default()
        };
        let widgets = vec![WidgetDescriptor::placed(WidgetKind::Knob, "Time", 0, 0).with_style(style)];
        let (_, source) = sources(&widgets);
        assert!(source.contains("new IBKnobControl(IRECT(0, 0, 80, 80), pGraphics->LoadBitmap(\"knob.png\", 64), kParamTime)"));
    }

    #[test]
    fn test_senders_and_messages() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::LedMeter, "Peak", 0, 0),
            WidgetDescriptor::placed(WidgetKind::AudioScope, "Scope", 0, 0),
            WidgetDescriptor::placed(WidgetKind::Transport(TransportAction::Tap), "Tap", 0, 0)
                .with_midi(30, 1),
        ];
        let (header, source) = sources(&widgets);
        assert!(header.contains("IPeakSender<2> mPeakSender;"));
        assert!(header.contains("IBufferSender<2> mScopeSender;"));
        assert!(header.contains("enum EMsgTags\n{\n  kMsgTagTap = 0,\n  kNumMsgTags\n};"));
        assert!(source.contains("mPeakSender.ProcessBlock(outputs, nFrames, kCtrlTagPeak);"));
        assert!(source.contains("mScopeSender.TransmitData(*this);"));
        assert!(source.contains("SendArbitraryMsgFromUI(kMsgTagTap)"));
        assert!(source.contains("if (channel == 1 && cc == 30 && raw >= 64)\n      mLastTrigger = kMsgTagTap;"));
        assert!(!source.contains("const double value"));
    }

    #[test]
    fn test_cc_glue_and_keyboard_channel() {
        let widgets = vec![
            WidgetDescriptor::placed(WidgetKind::Slider, "Feedback", 0, 0).with_midi(12, 4),
            WidgetDescriptor::placed(WidgetKind::MidiKeyboard, "Keys", 0, 0).with_midi(0, 2),
        ];
        let (_, source) = sources(&widgets);
        assert!(source.contains("if (channel == 4 && cc == 12)"));
        assert!(source.contains("GetParam(kParamFeedback)->SetNormalized(value);"));
        assert!(source.contains("SendParameterValueFromAPI(kParamFeedback, value, true);"));
        assert!(source.contains("if (msg.Channel() + 1 == 2 && (status == IMidiMsg::kNoteOn"));
    }
}
