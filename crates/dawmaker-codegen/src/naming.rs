use std::collections::HashSet;

use dawmaker_model::identifier::is_cpp_keyword;

const FALLBACK_IDENTIFIER: &str = "widget";

/// Turn an arbitrary widget name into a C++ identifier.
///
/// Non-alphanumeric characters become `_`, runs of `_` collapse, leading and
/// trailing `_` are dropped. A leading digit gets a `w_` prefix and keywords a
/// trailing `_`. The result never starts with `_` and never contains `__`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('_') {
        out.pop();
    }

    if out.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "w_");
    }
    if is_cpp_keyword(&out) {
        out.push('_');
    }
    out
}

/// Identifier constraints of one target framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingRules {
    /// Names the generated code already uses in widget scope
    pub reserved: &'static [&'static str],
    /// Suffixes the emitter appends to every widget identifier
    pub companions: &'static [&'static str],
    /// Suffixes appended to the plugin class name for generated C++ classes
    pub class_suffixes: &'static [&'static str],
}

/// Hands out unique identifiers in first-seen order.
///
/// A candidate is accepted only when it and every companion symbol derived
/// from it are unused, so `Cutoff` and `CutoffAttachment` can never clash
/// with a widget that is literally named `CutoffAttachment`.
#[derive(Debug, Clone, Default)]
pub struct IdentifierAllocator {
    used: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Sanitize `raw` and reserve it together with `base + suffix` for every suffix.
    pub fn allocate(&mut self, raw: &str, companions: &[&str]) -> String {
        let base = sanitize_identifier(raw);
        let stem = base.trim_end_matches('_').to_string();
        let mut n = 1usize;
        loop {
            let candidate = if n == 1 {
                base.clone()
            } else {
                format!("{stem}_{n}")
            };
            let free = !self.used.contains(&candidate)
                && companions
                    .iter()
                    .all(|s| !self.used.contains(&format!("{candidate}{s}")));
            if free {
                for s in companions {
                    self.used.insert(format!("{candidate}{s}"));
                }
                self.used.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

/// PascalCase class name for a plugin: `"my cool-plugin"` -> `MyCoolPlugin`.
pub fn class_name(plugin_name: &str) -> String {
    let mut out = String::new();
    for word in plugin_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        return "Plugin".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "Plugin");
    }
    out
}

/// Four-character plugin/manufacturer code: first char upper-case, the rest
/// lower-case, padded with `x`. `fallback` leads when the text has no usable
/// leading letter.
pub fn four_char_code(text: &str, fallback: char) -> String {
    let mut chars: Vec<char> = text.chars().filter(char::is_ascii_alphanumeric).collect();
    if chars.first().map_or(true, |c| c.is_ascii_digit()) {
        chars.insert(0, fallback);
    }
    let mut code: String = chars
        .into_iter()
        .take(4)
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    while code.len() < 4 {
        code.push('x');
    }
    code
}

/// Lower-case alphanumeric slug, used in bundle identifiers and URIs.
pub fn slug(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Reverse-DNS bundle identifier: `com.acme.myplugin`.
pub fn bundle_id(manufacturer: &str, plugin_name: &str) -> String {
    let vendor = slug(manufacturer);
    let product = slug(plugin_name);
    format!(
        "com.{}.{}",
        if vendor.is_empty() { "dawmaker" } else { vendor.as_str() },
        if product.is_empty() { "plugin" } else { product.as_str() }
    )
}

/// Quoted C++ string literal.
pub fn cpp_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // `?` would start a trigraph sequence before C++17
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// C++ `float` literal: `2.0f`, `0.25f`. Non-finite input becomes `0.0f`.
pub fn cpp_float(value: f32) -> String {
    if value.is_finite() {
        format!("{value:?}f")
    } else {
        "0.0f".to_string()
    }
}

/// Quoted CMake argument.
pub fn cmake_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' | '$' | ';' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
