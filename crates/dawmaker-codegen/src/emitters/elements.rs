use dawmaker_model::{Color, ControlRole, Framework, TransportBehavior, WidgetKind};

use crate::context::{EmitContext, IndentStyle};
use crate::emitters::{caption, cc_bound};
use crate::naming::{cpp_float, cpp_string_literal, NamingRules};
use crate::plan::{ExportPlan, ParamKind, PlannedWidget};
use crate::traits::{ignored_binding_comment, SourceEmitter};

/// Elements source emitter: a standalone `main.cpp` built from composed
/// elements.
pub struct ElementsEmitter;

const RESERVED: &[&str] = &[
    "background",
    "bkd_color",
    "midi_binding",
    "midi_bindings",
    "dispatch_cc",
    "make_controls",
    "level_meter",
    "scope_view",
    "xy_pad",
    "piano_keys",
    "main",
    "argc",
    "argv",
    "raw",
    "_app",
    "_win",
    "view_",
    "app",
    "window",
    "view",
    "element",
    "button",
    "toggle_button",
    "slider",
    "dial",
    "label",
    "layer",
    "margin",
    "hold",
    "share",
    "box",
    "image",
    "sprite",
    "color",
    "rgba",
    "rect",
    "point",
    "extent",
    "fixed_size",
    "align_left_top",
    "basic_knob",
    "radial_marks",
    "slider_marks",
    "basic_thumb",
    "basic_track",
    "cycfi",
    "std",
];

const TRACK_SIZE: u32 = 5;
const THUMB_SIZE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Dial,
    Slider { vertical: bool },
    Button,
    Toggle,
    Label,
    Meter,
    Scope,
    Pad,
    Keys,
}

impl Element {
    fn of(kind: &WidgetKind) -> Self {
        match kind {
            WidgetKind::Knob => Element::Dial,
            WidgetKind::Slider | WidgetKind::IndexedSlider { .. } => {
                Element::Slider { vertical: false }
            }
            WidgetKind::VerticalFader | WidgetKind::PitchWheel => {
                Element::Slider { vertical: true }
            }
            WidgetKind::Button => Element::Button,
            WidgetKind::ToggleButton | WidgetKind::ImageButton => Element::Toggle,
            WidgetKind::Label => Element::Label,
            WidgetKind::Meter | WidgetKind::BasicMeter | WidgetKind::VuMeter | WidgetKind::LedMeter => {
                Element::Meter
            }
            WidgetKind::Waveform | WidgetKind::AudioScope => Element::Scope,
            WidgetKind::XyPad | WidgetKind::Joystick => Element::Pad,
            WidgetKind::Transport(action) => match action.behavior() {
                TransportBehavior::Continuous => Element::Dial,
                TransportBehavior::Latching => Element::Toggle,
                TransportBehavior::Momentary => Element::Button,
            },
            WidgetKind::MidiKeyboard => Element::Keys,
        }
    }
}

fn rgba(c: Color) -> String {
    format!("rgba({}, {}, {}, {})", c.red(), c.green(), c.blue(), c.alpha())
}

/// Custom element classes the emitted view needs.
#[derive(Debug, Default)]
struct Features {
    meter: bool,
    scope: bool,
    pad: bool,
    keys: bool,
}

impl Features {
    fn of(plan: &ExportPlan<'_>) -> Self {
        let mut features = Features::default();
        for widget in &plan.widgets {
            match Element::of(widget.kind()) {
                Element::Meter => features.meter = true,
                Element::Scope => features.scope = true,
                Element::Pad => features.pad = true,
                Element::Keys => features.keys = true,
                Element::Dial
                | Element::Slider { .. }
                | Element::Button
                | Element::Toggle
                | Element::Label => {}
            }
        }
        features
    }
}

impl SourceEmitter for ElementsEmitter {
    fn framework(&self) -> Framework {
        Framework::Elements
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::spaces(3)
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
        plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let style = &widget.descriptor.style;
        let b = widget.descriptor.bounds;
        let fg = rgba(style.knob_color);
        let bg = rgba(style.bg_color);
        let initial = plan
            .primary_parameter(widget)
            .map(|p| p.kind.default_normalized())
            .unwrap_or(0.0);

        let element = match Element::of(widget.kind()) {
            Element::Dial => match style.filmstrip() {
                Some(path) => format!(
                    "dial(sprite{{{}, {}}}, {})",
                    cpp_string_literal(path),
                    b.height,
                    initial
                ),
                None => format!(
                    "dial(radial_marks<20>(basic_knob<{}>({fg})), {})",
                    b.width.min(b.height).saturating_sub(20).max(10),
                    initial
                ),
            },
            Element::Slider { vertical } => {
                let marks = match widget.kind() {
                    WidgetKind::IndexedSlider { .. } => {
                        let options = widget.kind().choice_options().len();
                        format!("slider_marks<20, {}, 1>", options.saturating_sub(1).max(1))
                    }
                    _ => "slider_marks<20>".to_string(),
                };
                format!(
                    "slider(basic_thumb<{THUMB_SIZE}>({fg}), {marks}(basic_track<{TRACK_SIZE}, {vertical}>({bg})), {})",
                    initial
                )
            }
            Element::Button => format!(
                "button({}, 1.0, {bg})",
                cpp_string_literal(caption(widget))
            ),
            Element::Toggle => format!(
                "toggle_button({}, 1.0, {bg})",
                cpp_string_literal(caption(widget))
            ),
            Element::Label => format!(
                "label({}).font_color({})",
                cpp_string_literal(widget.name()),
                rgba(style.text_color)
            ),
            Element::Meter => format!("level_meter({fg}, {bg})"),
            Element::Scope => format!("scope_view({fg}, {bg})"),
            Element::Pad => {
                let params = plan.parameters_of(widget);
                let x = params.first().map(|p| p.kind.default_normalized()).unwrap_or(0.0);
                let y = params.get(1).map(|p| p.kind.default_normalized()).unwrap_or(0.0);
                format!("xy_pad({fg}, {bg}, {}, {})", cpp_float(x), cpp_float(y))
            }
            Element::Keys => format!("piano_keys({fg}, {bg})"),
        };
        ctx.line(&format!("auto {} = share({element});", widget.ident))
    }

    fn emit_setup(
        &self,
        widget: &PlannedWidget<'_>,
        _plan: &ExportPlan<'_>,
        ctx: &mut EmitContext,
    ) -> String {
        let b = widget.descriptor.bounds;
        ctx.line(&format!(
            "align_left_top(margin({{{}, {}, 0, 0}}, fixed_size({{{}, {}}}, hold({})))),",
            b.x, b.y, b.width, b.height, widget.ident
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
        let ident = &widget.ident;

        let apply = match widget.role() {
            ControlRole::Keyboard => {
                return Some(ctx.line(&format!("{ident}->channel = {};", target.channel)))
            }
            ControlRole::Momentary => {
                format!("if (raw >= 64 && {ident}->on_click) {ident}->on_click(true);")
            }
            ControlRole::Toggle => format!("{ident}->value(raw >= 64);"),
            ControlRole::TwoAxis { .. } => format!("{ident}->x = raw / 127.0f;"),
            ControlRole::Choice => {
                let steps = plan
                    .primary_parameter(widget)
                    .map(|p| match &p.kind {
                        ParamKind::Choice { options, .. } => options.len().saturating_sub(1),
                        ParamKind::Continuous { .. } | ParamKind::Toggle { .. } => 1,
                    })
                    .unwrap_or(1)
                    .max(1);
                format!("{ident}->value(std::round(raw / 127.0 * {steps}) / {steps});")
            }
            ControlRole::Continuous { .. } => format!("{ident}->value(raw / 127.0);"),
            ControlRole::Display => return None,
        };
        Some(ctx.line(&format!(
            "midi_bindings.push_back({{{}, {}, [&view_](int raw) {{ {apply} view_.refresh(*{ident}); }}}});",
            target.channel, target.cc
        )))
    }

    fn emit_sources(&self, plan: &ExportPlan<'_>) -> Vec<(String, String)> {
        vec![("src/main.cpp".to_string(), self.main_source(plan))]
    }
}

impl ElementsEmitter {
    fn main_source(&self, plan: &ExportPlan<'_>) -> String {
        let features = Features::of(plan);
        let mut ctx = self.new_context();

        let mut support = String::new();
        if features.meter {
            support.push_str(LEVEL_METER);
        }
        if features.scope {
            support.push_str(SCOPE_VIEW);
        }
        if features.pad {
            support.push_str(XY_PAD);
        }
        if features.keys {
            support.push_str(PIANO_KEYS);
        }

        ctx.set_indent_level(1);
        let declarations: String = plan
            .widgets
            .iter()
            .map(|w| self.emit_declaration(w, plan, &mut ctx))
            .collect();

        ctx.set_indent_level(3);
        let placements: String = plan
            .widgets
            .iter()
            .map(|w| self.emit_setup(w, plan, &mut ctx))
            .collect();

        ctx.set_indent_level(1);
        let mut bindings = String::new();
        for widget in plan.widgets.iter().filter(|w| w.midi_ignored) {
            if let Some(comment) = self.emit_midi_binding(widget, plan, &mut ctx) {
                bindings.push_str(&comment);
            }
        }
        for widget in cc_bound(plan) {
            if let Some(glue) = self.emit_midi_binding(widget, plan, &mut ctx) {
                bindings.push_str(&glue);
            }
        }
        for widget in plan
            .widgets
            .iter()
            .filter(|w| w.role() == ControlRole::Keyboard && w.midi.is_some())
        {
            if let Some(channel) = self.emit_midi_binding(widget, plan, &mut ctx) {
                bindings.push_str(&channel);
            }
        }
        if !bindings.is_empty() {
            bindings.insert(0, '\n');
        }

        format!(
            r#"#include <elements.hpp>

#include <cmath>
#include <functional>
#include <vector>

using namespace cycfi::elements;

namespace
{{
   auto constexpr bkd_color = rgba(35, 35, 37, 255);
   auto background = box(bkd_color);
{support}
{declarations}
   struct midi_binding
   {{
      int channel;
      int cc;
      std::function<void(int)> apply;
   }};

   std::vector<midi_binding> midi_bindings;

   // Feed incoming control changes here. Channels are 1-based.
   void dispatch_cc(int channel, int cc, int raw)
   {{
      for (auto& binding : midi_bindings)
      {{
         if (binding.channel == channel && binding.cc == cc)
            binding.apply(raw);
      }}
   }}

   auto make_controls()
   {{
      return layer(
{placements}         background
      );
   }}
}}

int main(int argc, char* argv[])
{{
   app _app({name});
   window _win(_app.name(), window::standard, rect{{20, 20, {right}, {bottom}}});
   _win.on_close = [&_app]() {{ _app.stop(); }};

   view view_(_win);
{bindings}
   view_.content(make_controls());

   _app.run();
   return 0;
}}
"#,
            name = cpp_string_literal(&plan.identity.display_name),
            right = 20 + plan.editor_width,
            bottom = 20 + plan.editor_height,
        )
    }
}

const LEVEL_METER: &str = r#"
   class level_meter : public element
   {
   public:
      level_meter(color fg, color bg)
       : _fg(fg), _bg(bg)
      {}

      void draw(context const& ctx) override
      {
         auto& cnv = ctx.canvas;
         cnv.fill_style(_bg);
         cnv.fill_rect(ctx.bounds);
         auto bar = ctx.bounds;
         bar.top = bar.bottom - bar.height() * std::min(std::max(level, 0.0f), 1.0f);
         cnv.fill_style(_fg);
         cnv.fill_rect(bar);
      }

      float level = 0.0f;

   private:
      color _fg;
      color _bg;
   };
"#;

const SCOPE_VIEW: &str = r#"
   class scope_view : public element
   {
   public:
      scope_view(color fg, color bg)
       : _fg(fg), _bg(bg)
      {}

      void draw(context const& ctx) override
      {
         auto& cnv = ctx.canvas;
         cnv.fill_style(_bg);
         cnv.fill_rect(ctx.bounds);
         auto const b = ctx.bounds;
         auto const mid = b.top + b.height() / 2;
         cnv.begin_path();
         cnv.move_to(point{b.left, mid});
         for (std::size_t i = 0; i < samples.size(); ++i)
         {
            auto const x = b.left + b.width() * (i + 1) / samples.size();
            cnv.line_to(point{x, mid - samples[i] * b.height() / 2});
         }
         cnv.stroke_style(_fg);
         cnv.line_width(1.5);
         cnv.stroke();
      }

      std::vector<float> samples;

   private:
      color _fg;
      color _bg;
   };
"#;

const XY_PAD: &str = r#"
   class xy_pad : public element
   {
   public:
      xy_pad(color fg, color bg, float x_, float y_)
       : x(x_), y(y_), _fg(fg), _bg(bg)
      {}

      void draw(context const& ctx) override
      {
         auto& cnv = ctx.canvas;
         cnv.fill_style(_bg);
         cnv.fill_rect(ctx.bounds);
         auto const b = ctx.bounds;
         cnv.begin_path();
         cnv.add_circle(circle{b.left + b.width() * x, b.bottom - b.height() * y, 6});
         cnv.fill_style(_fg);
         cnv.fill();
      }

      bool wants_control() const override { return true; }

      bool click(context const& ctx, mouse_button btn) override
      {
         if (btn.down)
            track(ctx, btn.pos);
         return true;
      }

      void drag(context const& ctx, mouse_button btn) override
      {
         track(ctx, btn.pos);
      }

      float x;
      float y;
      std::function<void(float, float)> on_change;

   private:
      void track(context const& ctx, point p)
      {
         auto const b = ctx.bounds;
         x = std::min(std::max((p.x - b.left) / b.width(), 0.0f), 1.0f);
         y = std::min(std::max((b.bottom - p.y) / b.height(), 0.0f), 1.0f);
         if (on_change)
            on_change(x, y);
         ctx.view.refresh(ctx);
      }

      color _fg;
      color _bg;
   };
"#;

const PIANO_KEYS: &str = r#"
   class piano_keys : public element
   {
   public:
      static constexpr int base_note = 48;
      static constexpr int white_keys = 14;

      piano_keys(color fg, color bg)
       : _fg(fg), _bg(bg)
      {}

      void draw(context const& ctx) override
      {
         auto& cnv = ctx.canvas;
         auto const b = ctx.bounds;
         auto const key_width = b.width() / white_keys;
         cnv.fill_style(_bg);
         cnv.fill_rect(b);
         for (int i = 0; i < white_keys; ++i)
         {
            auto const left = b.left + i * key_width;
            cnv.fill_style(i == _held_key ? _fg : colors::white);
            cnv.fill_rect(rect{left + 1, b.top + 1, left + key_width - 1, b.bottom - 1});
         }
      }

      bool wants_control() const override { return true; }

      bool click(context const& ctx, mouse_button btn) override
      {
         static constexpr int offsets[7] = { 0, 2, 4, 5, 7, 9, 11 };
         if (btn.down)
         {
            auto const b = ctx.bounds;
            int key = static_cast<int>((btn.pos.x - b.left) / b.width() * white_keys);
            _held_key = std::min(std::max(key, 0), white_keys - 1);
            _held_note = base_note + (_held_key / 7) * 12 + offsets[_held_key % 7];
            if (on_note)
               on_note(channel, _held_note, true);
         }
         else if (_held_note >= 0)
         {
            if (on_note)
               on_note(channel, _held_note, false);
            _held_key = -1;
            _held_note = -1;
         }
         ctx.view.refresh(ctx);
         return true;
      }

      int channel = 1;
      std::function<void(int channel, int note, bool on)> on_note;

   private:
      color _fg;
      color _bg;
      int _held_key = -1;
      int _held_note = -1;
   };
"#;
