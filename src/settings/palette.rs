use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::schema::{BuiltinScheme, ThemeMode};

/// The fourteen semantic colors applied to the document for one scheme and mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub bg: Cow<'static, str>,
    pub bg_secondary: Cow<'static, str>,
    pub border: Cow<'static, str>,
    pub text: Cow<'static, str>,
    pub text_secondary: Cow<'static, str>,
    pub accent: Cow<'static, str>,
    pub btn_primary: Cow<'static, str>,
    pub btn_primary_hover: Cow<'static, str>,
    pub btn_secondary: Cow<'static, str>,
    pub btn_secondary_hover: Cow<'static, str>,
    pub code_inline_bg: Cow<'static, str>,
    pub code_inline_text: Cow<'static, str>,
    pub code_block_bg: Cow<'static, str>,
    pub code_block_text: Cow<'static, str>,
}

/// Wire key and document variable for each palette field, in application order.
pub static PALETTE_FIELDS: [(&str, &str); 14] = [
    ("bg", "--color-bg"),
    ("bgSecondary", "--color-bg-secondary"),
    ("border", "--color-border"),
    ("text", "--color-text"),
    ("textSecondary", "--color-text-secondary"),
    ("accent", "--color-accent"),
    ("btnPrimary", "--color-btn-primary"),
    ("btnPrimaryHover", "--color-btn-primary-hover"),
    ("btnSecondary", "--color-btn-secondary"),
    ("btnSecondaryHover", "--color-btn-secondary-hover"),
    ("codeInlineBg", "--color-code-inline-bg"),
    ("codeInlineText", "--color-code-inline-text"),
    ("codeBlockBg", "--color-code-block-bg"),
    ("codeBlockText", "--color-code-block-text"),
];

/// Derived "r, g, b" triplet of `btnSecondary`, used for translucent focus rings.
pub const SECONDARY_SHADOW_VAR: &str = "--color-btn-secondary-shadow";

impl Palette {
    fn field(&self, key: &str) -> Option<&Cow<'static, str>> {
        Some(match key {
            "bg" => &self.bg,
            "bgSecondary" => &self.bg_secondary,
            "border" => &self.border,
            "text" => &self.text,
            "textSecondary" => &self.text_secondary,
            "accent" => &self.accent,
            "btnPrimary" => &self.btn_primary,
            "btnPrimaryHover" => &self.btn_primary_hover,
            "btnSecondary" => &self.btn_secondary,
            "btnSecondaryHover" => &self.btn_secondary_hover,
            "codeInlineBg" => &self.code_inline_bg,
            "codeInlineText" => &self.code_inline_text,
            "codeBlockBg" => &self.code_block_bg,
            "codeBlockText" => &self.code_block_text,
            _ => return None,
        })
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Cow<'static, str>> {
        Some(match key {
            "bg" => &mut self.bg,
            "bgSecondary" => &mut self.bg_secondary,
            "border" => &mut self.border,
            "text" => &mut self.text,
            "textSecondary" => &mut self.text_secondary,
            "accent" => &mut self.accent,
            "btnPrimary" => &mut self.btn_primary,
            "btnPrimaryHover" => &mut self.btn_primary_hover,
            "btnSecondary" => &mut self.btn_secondary,
            "btnSecondaryHover" => &mut self.btn_secondary_hover,
            "codeInlineBg" => &mut self.code_inline_bg,
            "codeInlineText" => &mut self.code_inline_text,
            "codeBlockBg" => &mut self.code_block_bg,
            "codeBlockText" => &mut self.code_block_text,
            _ => return None,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.field(key).map(|v| v.as_ref())
    }

    /// Returns false for keys outside the fourteen known fields.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.field_mut(key) {
            Some(slot) => {
                *slot = Cow::Owned(value.into());
                true
            }
            None => false,
        }
    }

    /// `(document variable, color)` pairs in application order.
    pub fn variables(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        PALETTE_FIELDS
            .iter()
            .filter_map(move |(key, var)| self.get(key).map(|value| (*var, value)))
    }

    /// Default Gray; fresh and cleared custom slots start from these.
    pub fn default_for(mode: ThemeMode) -> Palette {
        builtin(BuiltinScheme::Default, mode).clone()
    }
}

macro_rules! palette {
    ($bg:literal, $bg_secondary:literal, $border:literal, $text:literal, $text_secondary:literal,
     $accent:literal, $btn_primary:literal, $btn_primary_hover:literal, $btn_secondary:literal,
     $btn_secondary_hover:literal, $code_inline_bg:literal, $code_inline_text:literal,
     $code_block_bg:literal, $code_block_text:literal $(,)?) => {
        Palette {
            bg: Cow::Borrowed($bg),
            bg_secondary: Cow::Borrowed($bg_secondary),
            border: Cow::Borrowed($border),
            text: Cow::Borrowed($text),
            text_secondary: Cow::Borrowed($text_secondary),
            accent: Cow::Borrowed($accent),
            btn_primary: Cow::Borrowed($btn_primary),
            btn_primary_hover: Cow::Borrowed($btn_primary_hover),
            btn_secondary: Cow::Borrowed($btn_secondary),
            btn_secondary_hover: Cow::Borrowed($btn_secondary_hover),
            code_inline_bg: Cow::Borrowed($code_inline_bg),
            code_inline_text: Cow::Borrowed($code_inline_text),
            code_block_bg: Cow::Borrowed($code_block_bg),
            code_block_text: Cow::Borrowed($code_block_text),
        }
    };
}

// Field order in every table: bg, bgSecondary, border, text, textSecondary,
// accent, btnPrimary, btnPrimaryHover, btnSecondary, btnSecondaryHover,
// codeInlineBg, codeInlineText, codeBlockBg, codeBlockText.

static DEFAULT_LIGHT: Palette = palette!(
    "#f9fafb", "#f3f4f6", "#e5e7eb", "#111827", "#6b7280", "#3b82f6", "#2563eb",
    "#1d4ed8", "#7c3aed", "#6d28d9", "#e5e7eb", "#111827", "#f6f8fa", "#24292f",
);
static AYU_LIGHT: Palette = palette!(
    "#e8f0f7", "#dce6ed", "#b8c5d0", "#1a2633", "#4a5f7a", "#4A90E2", "#4A90E2",
    "#3A7BC8", "#8B5CF6", "#7C3AED", "#b8c5d0", "#1a2633", "#dce6ed", "#1a2633",
);
static BEARDED_LIGHT: Palette = palette!(
    "#f5f3f0", "#ebe8e3", "#d4cfc8", "#2d2a27", "#5a5550", "#C6910C", "#C6910C",
    "#B08209", "#E6A839", "#D09828", "#d4cfc8", "#2d2a27", "#ebe8e3", "#2d2a27",
);
static CYBERPUNK_LIGHT: Palette = palette!(
    "#f0f0f5", "#e5e5eb", "#c5c5d0", "#1a1a20", "#4a4a55", "#FF0055", "#FF0055",
    "#E60048", "#00FFC8", "#00E6B3", "#c5c5d0", "#1a1a20", "#e5e5eb", "#1a1a20",
);
static EVA_LIGHT: Palette = palette!(
    "#F5F6F8", "#ECEEF1", "#D4D7DC", "#1A1D22", "#4A4F5E", "#598DEF", "#598DEF",
    "#4A7DD9", "#7C8AE0", "#6979CC", "#D4D7DC", "#1A1D22", "#ECEEF1", "#1A1D22",
);
static GRUVBOX_LIGHT: Palette = palette!(
    "#FBF1C7", "#EADBB2", "#D5C4A1", "#3C3836", "#504945", "#458588", "#458588",
    "#076678", "#689D6A", "#79740E", "#D5C4A1", "#3C3836", "#EADBB2", "#3C3836",
);

static DEFAULT_DARK: Palette = palette!(
    "#111827", "#1f2937", "#374151", "#f9fafb", "#9ca3af", "#3b82f6", "#2563eb",
    "#1d4ed8", "#7c3aed", "#6d28d9", "#374151", "#f9fafb", "#1f2937", "#e5e7eb",
);
static AYU_DARK: Palette = palette!(
    "#0A0E14", "#0B0F16", "#30363D", "#E6E8EB", "#C2C9D6", "#4A90E2", "#4A90E2",
    "#5BA3F5", "#8B5CF6", "#9D6FF7", "#30363D", "#E6E8EB", "#0B0F16", "#E6E8EB",
);
static BEARDED_DARK: Palette = palette!(
    "#221F1D", "#1C1918", "#3A3532", "#DEDBD8", "#D5D1CF", "#C6910C", "#C6910C",
    "#DBA515", "#E6A839", "#F0B84A", "#3A3532", "#DEDBD8", "#1C1918", "#DEDBD8",
);
static CYBERPUNK_DARK: Palette = palette!(
    "#101116", "#0C0D12", "#2A2B35", "#FFFFFF", "#E0E0E5", "#FF0055", "#FF0055",
    "#FF1A6B", "#00FFC8", "#1AFFDA", "#2A2B35", "#FFFFFF", "#0C0D12", "#FFFFFF",
);
static EVA_DARK: Palette = palette!(
    "#272C33", "#21252B", "#3B424D", "#FFFFFF", "#9DA5B3", "#598DEF", "#598DEF",
    "#6FA3F7", "#7C8AE0", "#8F9BED", "#3B424D", "#FFFFFF", "#21252B", "#FFFFFF",
);
static GRUVBOX_DARK: Palette = palette!(
    "#1D2021", "#282828", "#3C3836", "#FBF1C7", "#EADBB2", "#83A598", "#83A598",
    "#93B5A8", "#689D6A", "#78AD7A", "#3C3836", "#FBF1C7", "#282828", "#FBF1C7",
);

pub fn builtin(scheme: BuiltinScheme, mode: ThemeMode) -> &'static Palette {
    match (mode, scheme) {
        (ThemeMode::Light, BuiltinScheme::Default) => &DEFAULT_LIGHT,
        (ThemeMode::Light, BuiltinScheme::Ayu) => &AYU_LIGHT,
        (ThemeMode::Light, BuiltinScheme::Bearded) => &BEARDED_LIGHT,
        (ThemeMode::Light, BuiltinScheme::Cyberpunk) => &CYBERPUNK_LIGHT,
        (ThemeMode::Light, BuiltinScheme::Eva) => &EVA_LIGHT,
        (ThemeMode::Light, BuiltinScheme::Gruvbox) => &GRUVBOX_LIGHT,
        (ThemeMode::Dark, BuiltinScheme::Default) => &DEFAULT_DARK,
        (ThemeMode::Dark, BuiltinScheme::Ayu) => &AYU_DARK,
        (ThemeMode::Dark, BuiltinScheme::Bearded) => &BEARDED_DARK,
        (ThemeMode::Dark, BuiltinScheme::Cyberpunk) => &CYBERPUNK_DARK,
        (ThemeMode::Dark, BuiltinScheme::Eva) => &EVA_DARK,
        (ThemeMode::Dark, BuiltinScheme::Gruvbox) => &GRUVBOX_DARK,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

/// Strict `#rrggbb` parse (leading `#` optional). Shorthand, alpha and
/// anything non-hex yield `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}
