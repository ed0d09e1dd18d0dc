use std::fmt;
use std::str::FromStr;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 32-bit ARGB colour, persisted as an 8-digit hex string (`"ff00d4ff"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour '{0}': expected 6 or 8 hex digits")]
pub struct ParseColorError(String);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const WHITE: Color = Color(0xffff_ffff);
    pub const BLACK: Color = Color(0xff00_0000);
    pub const ACCENT: Color = Color(0xff00_d4ff);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// Lowercase `aarrggbb`
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(s.to_string()))?;
        match digits.len() {
            8 => Ok(Color(value)),
            6 => Ok(Color(0xff00_0000 | value)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for Color {
    fn schema_name() -> String {
        "Color".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = String::json_schema(gen).into_object();
        schema.string().pattern =
            Some("^(#|0x|0X)?([0-9a-fA-F]{6}|[0-9a-fA-F]{8})$".to_string());
        schema.into()
    }
}

/// Which of the four style indices a widget kind reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Knob,
    Slider,
    Button,
    Label,
}

/// Drawing flags shared by every framework for one built-in look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinStyle {
    pub name: &'static str,
    pub draw_frame: bool,
    pub draw_shadows: bool,
    pub emboss: bool,
    /// Corner roundness as a fraction of the control's short edge
    pub roundness: f32,
}

const fn builtin(
    name: &'static str,
    draw_frame: bool,
    draw_shadows: bool,
    emboss: bool,
    roundness: f32,
) -> BuiltinStyle {
    BuiltinStyle {
        name,
        draw_frame,
        draw_shadows,
        emboss,
        roundness,
    }
}

pub const BUILTIN_STYLES: [BuiltinStyle; 10] = [
    builtin("Classic", true, true, false, 0.0),
    builtin("Filled", false, false, false, 0.25),
    builtin("Outline", true, false, false, 0.1),
    builtin("Minimal", false, false, false, 0.0),
    builtin("Vintage", true, true, true, 0.2),
    builtin("Modern", false, true, false, 0.5),
    builtin("Neon", true, false, false, 0.3),
    builtin("Flat", false, false, false, 0.15),
    builtin("Glass", true, true, false, 0.6),
    builtin("Metal", true, true, true, 0.1),
];

/// Wrap any raw style index into the built-in table
pub fn resolve_style_index(raw: i32) -> usize {
    raw.rem_euclid(BUILTIN_STYLES.len() as i32) as usize
}

/// Visual properties of one widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetStyle {
    pub bg_color: Color,
    pub border_color: Color,
    pub knob_color: Color,
    pub text_color: Color,
    pub border_width: f32,
    pub corner_radius: f32,
    pub fill_knob: bool,
    pub knob_style: i32,
    pub slider_style: i32,
    pub button_style: i32,
    pub label_style: i32,
    /// Vertical filmstrip image used instead of vector drawing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filmstrip_path: Option<String>,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            bg_color: Color::TRANSPARENT,
            border_color: Color::TRANSPARENT,
            knob_color: Color::ACCENT,
            text_color: Color::WHITE,
            border_width: 2.0,
            corner_radius: 5.0,
            fill_knob: true,
            knob_style: 0,
            slider_style: 0,
            button_style: 0,
            label_style: 0,
            filmstrip_path: None,
        }
    }
}

impl WidgetStyle {
    pub fn raw_index(&self, slot: StyleSlot) -> i32 {
        match slot {
            StyleSlot::Knob => self.knob_style,
            StyleSlot::Slider => self.slider_style,
            StyleSlot::Button => self.button_style,
            StyleSlot::Label => self.label_style,
        }
    }

    /// Index into [`BUILTIN_STYLES`], wrapped modulo the table size
    pub fn style_index(&self, slot: StyleSlot) -> usize {
        resolve_style_index(self.raw_index(slot))
    }

    pub fn builtin(&self, slot: StyleSlot) -> &'static BuiltinStyle {
        &BUILTIN_STYLES[self.style_index(slot)]
    }

    /// Filmstrip path, ignoring blank strings
    pub fn filmstrip(&self) -> Option<&str> {
        self.filmstrip_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
