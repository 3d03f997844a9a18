//! User preferences: font size, light/dark scheme selection, six custom
//! theme slots and external-terminal options.
//!
//! Every accepted mutation is written through to the [`KeyValueStore`]
//! immediately; visual mutations also recompute the [`DocumentStyle`].
//! Setters for enumerated fields silently ignore values outside their domain.

mod document;
mod palette;
mod schema;
pub mod storage;

pub use document::DocumentStyle;
pub use palette::{builtin, hex_to_rgb, Palette, Rgb, PALETTE_FIELDS, SECONDARY_SHADOW_VAR};
pub use schema::{BuiltinScheme, ColorScheme, FontSize, SplitDirection, ThemeMode, ThemeSlot, WindowMode};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};

use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::terminal::TerminalSettings;

pub const WINDOW_WIDTH_RANGE: (i64, i64) = (800, 3000);
pub const WINDOW_HEIGHT_RANGE: (i64, i64) = (300, 1500);
pub const DEFAULT_WINDOW_WIDTH: i64 = 1700;
pub const DEFAULT_WINDOW_HEIGHT: i64 = 450;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    EmptyThemeName,
    InvalidSlot(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::EmptyThemeName => f.write_str("Theme name cannot be empty"),
            SettingsError::InvalidSlot(slot) => write!(f, "Invalid slot key: {slot}"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CustomTheme {
    name: String,
    light: Palette,
    dark: Palette,
}

impl CustomTheme {
    fn blank() -> Self {
        Self {
            name: String::new(),
            light: Palette::default_for(ThemeMode::Light),
            dark: Palette::default_for(ThemeMode::Dark),
        }
    }

    fn palette(&self, mode: ThemeMode) -> &Palette {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }

    fn palette_mut(&mut self, mode: ThemeMode) -> &mut Palette {
        match mode {
            ThemeMode::Light => &mut self.light,
            ThemeMode::Dark => &mut self.dark,
        }
    }
}

/// Units of persistence; each setter saves exactly the group it touched.
#[derive(Debug, Clone, Copy)]
enum FieldGroup {
    FontSize,
    ColorSchemeLight,
    ColorSchemeDark,
    ThemeNames,
    SlotPalettes(ThemeSlot),
    TerminalWindowMode,
    TerminalSplitDirection,
    TerminalShowSplit,
    TerminalWindowWidth,
    TerminalWindowHeight,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub font_size: FontSize,
    pub color_scheme_light: ColorScheme,
    pub color_scheme_dark: ColorScheme,
    pub custom_theme_names: BTreeMap<&'static str, String>,
    pub terminal_window_mode: WindowMode,
    pub terminal_split_direction: SplitDirection,
    pub terminal_show_split: bool,
    pub terminal_window_width: i64,
    pub terminal_window_height: i64,
    pub dark_mode: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomThemeInfo {
    pub slot_key: ThemeSlot,
    pub name: String,
    pub light_colors: Palette,
    pub dark_colors: Palette,
}

pub struct SettingsStore {
    storage: Box<dyn KeyValueStore>,
    font_size: FontSize,
    color_scheme_light: ColorScheme,
    color_scheme_dark: ColorScheme,
    custom: [CustomTheme; 6],
    terminal_window_mode: WindowMode,
    terminal_split_direction: SplitDirection,
    terminal_show_split: bool,
    terminal_window_width: i64,
    terminal_window_height: i64,
    document: DocumentStyle,
}

fn clamp_dimension(value: i64, (min, max): (i64, i64)) -> i64 {
    value.clamp(min, max)
}

/// Lenient integer read used for stored and wire dimensions: numbers are
/// truncated, strings parsed after trimming, anything else is `None`.
pub fn dimension_from_json(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits_end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..digits_end].parse().ok()
}

impl SettingsStore {
    /// Reads every key, falling back to defaults for anything missing or
    /// unparseable, then applies the visual state once.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let read = |key: &str| storage.get(key);

        let font_size = read(storage::FONT_SIZE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(FontSize::Medium);

        let names: HashMap<String, String> = read(storage::CUSTOM_THEME_NAMES)
            .and_then(|v| serde_json::from_str(&v).ok())
            .unwrap_or_default();

        let custom: [CustomTheme; 6] = std::array::from_fn(|i| {
            let slot = ThemeSlot::ALL[i];
            let palette = |mode| {
                read(&storage::slot_palette_key(slot, mode))
                    .and_then(|v| serde_json::from_str::<Palette>(&v).ok())
                    .unwrap_or_else(|| Palette::default_for(mode))
            };
            CustomTheme {
                name: names.get(slot.as_str()).cloned().unwrap_or_default(),
                light: palette(ThemeMode::Light),
                dark: palette(ThemeMode::Dark),
            }
        });

        let scheme = |key: &str| -> ColorScheme {
            match read(key).and_then(|v| v.parse().ok()) {
                Some(ColorScheme::Custom(slot)) if custom[slot.index()].name.is_empty() => {
                    ColorScheme::DEFAULT
                }
                Some(scheme) => scheme,
                None => ColorScheme::DEFAULT,
            }
        };
        let color_scheme_light = scheme(storage::COLOR_SCHEME_LIGHT);
        let color_scheme_dark = scheme(storage::COLOR_SCHEME_DARK);

        let terminal_window_mode = read(storage::TERMINAL_WINDOW_MODE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(WindowMode::Window);
        let terminal_split_direction = read(storage::TERMINAL_SPLIT_DIRECTION)
            .and_then(|v| v.parse().ok())
            .unwrap_or(SplitDirection::Vertical);
        let terminal_show_split = read(storage::TERMINAL_SHOW_SPLIT).as_deref() != Some("false");
        let dimension = |key: &str, default: i64, range| {
            let stored = read(key)
                .and_then(|v| parse_leading_int(&v))
                .filter(|v| *v != 0)
                .unwrap_or(default);
            clamp_dimension(stored, range)
        };
        let terminal_window_width =
            dimension(storage::TERMINAL_WINDOW_WIDTH, DEFAULT_WINDOW_WIDTH, WINDOW_WIDTH_RANGE);
        let terminal_window_height =
            dimension(storage::TERMINAL_WINDOW_HEIGHT, DEFAULT_WINDOW_HEIGHT, WINDOW_HEIGHT_RANGE);

        let mut store = Self {
            storage,
            font_size,
            color_scheme_light,
            color_scheme_dark,
            custom,
            terminal_window_mode,
            terminal_split_direction,
            terminal_show_split,
            terminal_window_width,
            terminal_window_height,
            document: DocumentStyle::default(),
        };
        store.initialize();
        store
    }

    /// Applies font size and color scheme to the document.
    pub fn initialize(&mut self) {
        self.apply_font_size();
        self.apply_color_scheme();
    }

    fn persist(&mut self, group: FieldGroup) {
        debug!("Persisting settings group {:?}", group);
        match group {
            FieldGroup::FontSize => {
                self.storage.set(storage::FONT_SIZE, self.font_size.as_str().to_string())
            }
            FieldGroup::ColorSchemeLight => self.storage.set(
                storage::COLOR_SCHEME_LIGHT,
                self.color_scheme_light.as_str().to_string(),
            ),
            FieldGroup::ColorSchemeDark => self.storage.set(
                storage::COLOR_SCHEME_DARK,
                self.color_scheme_dark.as_str().to_string(),
            ),
            FieldGroup::ThemeNames => match serde_json::to_string(&self.custom_theme_names()) {
                Ok(json) => self.storage.set(storage::CUSTOM_THEME_NAMES, json),
                Err(e) => warn!("Failed to encode custom theme names: {}", e),
            },
            FieldGroup::SlotPalettes(slot) => {
                for mode in ThemeMode::ALL {
                    let theme = &self.custom[slot.index()];
                    match serde_json::to_string(theme.palette(*mode)) {
                        Ok(json) => self.storage.set(&storage::slot_palette_key(slot, *mode), json),
                        Err(e) => warn!("Failed to encode palette for {}: {}", slot, e),
                    }
                }
            }
            FieldGroup::TerminalWindowMode => self.storage.set(
                storage::TERMINAL_WINDOW_MODE,
                self.terminal_window_mode.as_str().to_string(),
            ),
            FieldGroup::TerminalSplitDirection => self.storage.set(
                storage::TERMINAL_SPLIT_DIRECTION,
                self.terminal_split_direction.as_str().to_string(),
            ),
            FieldGroup::TerminalShowSplit => self
                .storage
                .set(storage::TERMINAL_SHOW_SPLIT, self.terminal_show_split.to_string()),
            FieldGroup::TerminalWindowWidth => self.storage.set(
                storage::TERMINAL_WINDOW_WIDTH,
                self.terminal_window_width.to_string(),
            ),
            FieldGroup::TerminalWindowHeight => self.storage.set(
                storage::TERMINAL_WINDOW_HEIGHT,
                self.terminal_window_height.to_string(),
            ),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn color_scheme_light(&self) -> ColorScheme {
        self.color_scheme_light
    }

    pub fn color_scheme_dark(&self) -> ColorScheme {
        self.color_scheme_dark
    }

    pub fn terminal_window_mode(&self) -> WindowMode {
        self.terminal_window_mode
    }

    pub fn terminal_split_direction(&self) -> SplitDirection {
        self.terminal_split_direction
    }

    pub fn terminal_show_split(&self) -> bool {
        self.terminal_show_split
    }

    pub fn terminal_window_width(&self) -> i64 {
        self.terminal_window_width
    }

    pub fn terminal_window_height(&self) -> i64 {
        self.terminal_window_height
    }

    pub fn document(&self) -> &DocumentStyle {
        &self.document
    }

    pub fn custom_theme_names(&self) -> BTreeMap<&'static str, String> {
        ThemeSlot::ALL
            .iter()
            .map(|slot| (slot.as_str(), self.custom[slot.index()].name.clone()))
            .collect()
    }

    pub fn custom_palette(&self, slot: ThemeSlot, mode: ThemeMode) -> &Palette {
        self.custom[slot.index()].palette(mode)
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            font_size: self.font_size,
            color_scheme_light: self.color_scheme_light,
            color_scheme_dark: self.color_scheme_dark,
            custom_theme_names: self.custom_theme_names(),
            terminal_window_mode: self.terminal_window_mode,
            terminal_split_direction: self.terminal_split_direction,
            terminal_show_split: self.terminal_show_split,
            terminal_window_width: self.terminal_window_width,
            terminal_window_height: self.terminal_window_height,
            dark_mode: self.document.dark,
        }
    }

    /// Terminal options in the shape the launcher consumes.
    pub fn terminal_settings(&self) -> TerminalSettings {
        TerminalSettings {
            window_mode: self.terminal_window_mode,
            show_split: self.terminal_show_split,
            split_direction: self.terminal_split_direction,
            window_width: self.terminal_window_width,
            window_height: self.terminal_window_height,
        }
    }

    // ── Setters ──────────────────────────────────────────────────────────
    //
    // Each returns whether the value was accepted.

    pub fn set_font_size(&mut self, value: &str) -> bool {
        let Ok(size) = value.parse() else {
            return false;
        };
        self.font_size = size;
        self.persist(FieldGroup::FontSize);
        self.apply_font_size();
        true
    }

    fn selectable(&self, value: &str) -> Option<ColorScheme> {
        match value.parse().ok()? {
            ColorScheme::Custom(slot) if self.custom[slot.index()].name.is_empty() => None,
            scheme => Some(scheme),
        }
    }

    pub fn set_color_scheme_light(&mut self, value: &str) -> bool {
        let Some(scheme) = self.selectable(value) else {
            return false;
        };
        self.color_scheme_light = scheme;
        self.persist(FieldGroup::ColorSchemeLight);
        self.apply_color_scheme();
        true
    }

    pub fn set_color_scheme_dark(&mut self, value: &str) -> bool {
        let Some(scheme) = self.selectable(value) else {
            return false;
        };
        self.color_scheme_dark = scheme;
        self.persist(FieldGroup::ColorSchemeDark);
        self.apply_color_scheme();
        true
    }

    /// The renderer's light/dark toggle.
    pub fn set_dark_mode(&mut self, dark: bool) -> bool {
        self.document.dark = dark;
        self.apply_color_scheme();
        true
    }

    pub fn set_terminal_window_mode(&mut self, value: &str) -> bool {
        let Ok(mode) = value.parse() else {
            return false;
        };
        self.terminal_window_mode = mode;
        self.persist(FieldGroup::TerminalWindowMode);
        true
    }

    pub fn set_terminal_split_direction(&mut self, value: &str) -> bool {
        let Ok(direction) = value.parse() else {
            return false;
        };
        self.terminal_split_direction = direction;
        self.persist(FieldGroup::TerminalSplitDirection);
        true
    }

    pub fn set_terminal_show_split(&mut self, show: bool) -> bool {
        self.terminal_show_split = show;
        self.persist(FieldGroup::TerminalShowSplit);
        true
    }

    /// Clamped to 800..=3000.
    pub fn set_terminal_window_width(&mut self, width: i64) -> bool {
        self.terminal_window_width = clamp_dimension(width, WINDOW_WIDTH_RANGE);
        self.persist(FieldGroup::TerminalWindowWidth);
        true
    }

    /// Clamped to 300..=1500.
    pub fn set_terminal_window_height(&mut self, height: i64) -> bool {
        self.terminal_window_height = clamp_dimension(height, WINDOW_HEIGHT_RANGE);
        self.persist(FieldGroup::TerminalWindowHeight);
        true
    }

    /// Edits one color of one slot. Unknown slots, modes or color keys are ignored.
    pub fn set_custom_theme_color(&mut self, slot: &str, mode: &str, color_key: &str, value: &str) -> bool {
        let (Ok(slot), Ok(mode)) = (slot.parse::<ThemeSlot>(), mode.parse::<ThemeMode>()) else {
            return false;
        };
        if !self.custom[slot.index()].palette_mut(mode).set(color_key, value) {
            return false;
        }
        self.persist(FieldGroup::SlotPalettes(slot));
        self.apply_color_scheme();
        true
    }

    /// Names a slot and replaces both of its palettes wholesale.
    pub fn save_theme_to_slot(
        &mut self,
        slot: &str,
        name: &str,
        light: Palette,
        dark: Palette,
    ) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::EmptyThemeName);
        }
        let slot: ThemeSlot = slot
            .parse()
            .map_err(|_| SettingsError::InvalidSlot(slot.to_string()))?;

        self.custom[slot.index()] = CustomTheme {
            name: name.to_string(),
            light,
            dark,
        };
        self.persist(FieldGroup::ThemeNames);
        self.persist(FieldGroup::SlotPalettes(slot));
        self.apply_color_scheme();
        Ok(())
    }

    /// Empties a slot, restores default colors and deselects it wherever it is active.
    pub fn clear_theme_slot(&mut self, slot: &str) -> Result<(), SettingsError> {
        let slot: ThemeSlot = slot
            .parse()
            .map_err(|_| SettingsError::InvalidSlot(slot.to_string()))?;

        self.custom[slot.index()] = CustomTheme::blank();
        self.persist(FieldGroup::ThemeNames);
        self.persist(FieldGroup::SlotPalettes(slot));

        if self.color_scheme_light == ColorScheme::Custom(slot) {
            self.color_scheme_light = ColorScheme::DEFAULT;
            self.persist(FieldGroup::ColorSchemeLight);
        }
        if self.color_scheme_dark == ColorScheme::Custom(slot) {
            self.color_scheme_dark = ColorScheme::DEFAULT;
            self.persist(FieldGroup::ColorSchemeDark);
        }
        self.apply_color_scheme();
        Ok(())
    }

    /// Named slots only, in slot order.
    pub fn custom_themes(&self) -> Vec<CustomThemeInfo> {
        ThemeSlot::ALL
            .iter()
            .filter_map(|slot| {
                let theme = &self.custom[slot.index()];
                (!theme.name.is_empty()).then(|| CustomThemeInfo {
                    slot_key: *slot,
                    name: theme.name.clone(),
                    light_colors: theme.light.clone(),
                    dark_colors: theme.dark.clone(),
                })
            })
            .collect()
    }

    // ── Document application ─────────────────────────────────────────────

    fn active_scheme(&self) -> ColorScheme {
        match self.document.mode() {
            ThemeMode::Light => self.color_scheme_light,
            ThemeMode::Dark => self.color_scheme_dark,
        }
    }

    fn active_palette(&self) -> &Palette {
        let mode = self.document.mode();
        match self.active_scheme() {
            ColorScheme::Custom(slot) => self.custom[slot.index()].palette(mode),
            ColorScheme::Builtin(scheme) => palette::builtin(scheme, mode),
        }
    }

    /// Copy of the palette currently applied.
    pub fn current_theme_colors(&self) -> Palette {
        self.active_palette().clone()
    }

    /// Slot name for custom schemes, otherwise the preset's label for the current mode.
    pub fn current_theme_name(&self) -> String {
        match self.active_scheme() {
            ColorScheme::Custom(slot) => self.custom[slot.index()].name.clone(),
            ColorScheme::Builtin(scheme) => scheme.label(self.document.mode()).to_string(),
        }
    }

    fn apply_font_size(&mut self) {
        self.document.font_size = Some(self.font_size.css_value().to_string());
    }

    /// Writes the active palette into the document variables, plus the
    /// derived secondary shadow when `btnSecondary` is a plain 6-digit hex.
    pub fn apply_color_scheme(&mut self) {
        let palette = self.active_palette().clone();
        for (var, value) in palette.variables() {
            self.document.set_property(var, value);
        }
        if let Some(rgb) = hex_to_rgb(&palette.btn_secondary) {
            self.document.set_property(SECONDARY_SHADOW_VAR, &rgb.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::load(Box::new(MemoryStore::new()))
    }

    fn seeded(entries: &[(&str, &str)]) -> SettingsStore {
        let mut backing = MemoryStore::new();
        for (k, v) in entries {
            backing.set(k, v.to_string());
        }
        SettingsStore::load(Box::new(backing))
    }

    fn palettes() -> (Palette, Palette) {
        let mut light = Palette::default_for(ThemeMode::Light);
        let mut dark = Palette::default_for(ThemeMode::Dark);
        light.set("accent", "#112233");
        dark.set("btnSecondary", "#445566");
        (light, dark)
    }

    #[test]
    fn defaults_when_storage_is_empty() {
        let s = store();
        assert_eq!(s.font_size(), FontSize::Medium);
        assert_eq!(s.color_scheme_light(), ColorScheme::DEFAULT);
        assert_eq!(s.color_scheme_dark(), ColorScheme::DEFAULT);
        assert_eq!(s.terminal_window_mode(), WindowMode::Window);
        assert_eq!(s.terminal_split_direction(), SplitDirection::Vertical);
        assert!(s.terminal_show_split());
        assert_eq!(s.terminal_window_width(), 1700);
        assert_eq!(s.terminal_window_height(), 450);
        assert!(s.custom_theme_names().values().all(|n| n.is_empty()));
        assert_eq!(s.document().font_size.as_deref(), Some("1rem"));
        assert_eq!(s.document().property("--color-bg"), Some("#f9fafb"));
    }

    #[test]
    fn stored_values_are_loaded_and_bad_ones_ignored() {
        let s = seeded(&[
            (storage::FONT_SIZE, "large"),
            (storage::COLOR_SCHEME_LIGHT, "gruvbox"),
            (storage::COLOR_SCHEME_DARK, "solarized"),
            (storage::TERMINAL_SHOW_SPLIT, "false"),
            (storage::TERMINAL_WINDOW_WIDTH, "2000"),
            (storage::TERMINAL_WINDOW_HEIGHT, "tall"),
        ]);
        assert_eq!(s.font_size(), FontSize::Large);
        assert_eq!(s.color_scheme_light(), ColorScheme::Builtin(BuiltinScheme::Gruvbox));
        assert_eq!(s.color_scheme_dark(), ColorScheme::DEFAULT);
        assert!(!s.terminal_show_split());
        assert_eq!(s.terminal_window_width(), 2000);
        assert_eq!(s.terminal_window_height(), 450);
    }

    #[test]
    fn invalid_enum_values_are_silently_rejected() {
        let mut s = store();
        assert!(!s.set_font_size("gigantic"));
        assert!(!s.set_color_scheme_light("solarized"));
        assert!(!s.set_terminal_window_mode("floating"));
        assert!(!s.set_terminal_split_direction("diagonal"));
        assert_eq!(s.font_size(), FontSize::Medium);
        assert_eq!(s.color_scheme_light(), ColorScheme::DEFAULT);
        assert_eq!(s.terminal_window_mode(), WindowMode::Window);
        assert_eq!(s.terminal_split_direction(), SplitDirection::Vertical);
    }

    #[test]
    fn accepted_values_are_persisted() {
        let mut backing = MemoryStore::new();
        backing.set(storage::FONT_SIZE, "small".to_string());
        let mut s = SettingsStore::load(Box::new(backing));

        assert!(s.set_font_size("extra-large"));
        assert!(s.set_terminal_window_mode("tab"));
        assert!(s.set_terminal_show_split(false));
        assert_eq!(s.storage.get(storage::FONT_SIZE).as_deref(), Some("extra-large"));
        assert_eq!(s.storage.get(storage::TERMINAL_WINDOW_MODE).as_deref(), Some("tab"));
        assert_eq!(s.storage.get(storage::TERMINAL_SHOW_SPLIT).as_deref(), Some("false"));
        assert_eq!(s.document().font_size.as_deref(), Some("1.25rem"));
    }

    #[test]
    fn window_dimensions_are_clamped() {
        let mut s = store();
        s.set_terminal_window_width(50);
        assert_eq!(s.terminal_window_width(), 800);
        s.set_terminal_window_width(9999);
        assert_eq!(s.terminal_window_width(), 3000);
        s.set_terminal_window_height(10);
        assert_eq!(s.terminal_window_height(), 300);
        s.set_terminal_window_height(4000);
        assert_eq!(s.terminal_window_height(), 1500);
        assert_eq!(s.storage.get(storage::TERMINAL_WINDOW_HEIGHT).as_deref(), Some("1500"));
    }

    #[test]
    fn dimensions_parse_leniently_from_json() {
        assert_eq!(dimension_from_json(&serde_json::json!(1200)), Some(1200));
        assert_eq!(dimension_from_json(&serde_json::json!(1200.7)), Some(1200));
        assert_eq!(dimension_from_json(&serde_json::json!(" 900px")), Some(900));
        assert_eq!(dimension_from_json(&serde_json::json!("wide")), None);
        assert_eq!(dimension_from_json(&serde_json::json!(null)), None);
    }

    #[test]
    fn dark_mode_switches_active_palette() {
        let mut s = store();
        assert!(s.set_color_scheme_dark("cyberpunk"));
        assert_eq!(s.document().property("--color-bg"), Some("#f9fafb"));

        s.set_dark_mode(true);
        assert_eq!(s.document().property("--color-bg"), Some("#101116"));
        assert_eq!(s.document().property(SECONDARY_SHADOW_VAR), Some("0, 255, 200"));
        assert_eq!(s.current_theme_name(), "Cyberpunk Scarlet");
        assert_eq!(s.current_theme_colors(), *builtin(BuiltinScheme::Cyberpunk, ThemeMode::Dark));
    }

    #[test]
    fn save_requires_a_name_and_a_known_slot() {
        let mut s = store();
        let (light, dark) = palettes();
        assert_eq!(
            s.save_theme_to_slot("custom_01", "", light.clone(), dark.clone()),
            Err(SettingsError::EmptyThemeName)
        );
        assert_eq!(
            s.save_theme_to_slot("custom_01", "   ", light.clone(), dark.clone()),
            Err(SettingsError::EmptyThemeName)
        );
        assert_eq!(
            s.save_theme_to_slot("custom_9", "Mine", light, dark),
            Err(SettingsError::InvalidSlot("custom_9".to_string()))
        );
        assert!(s.custom_theme_names().values().all(|n| n.is_empty()));
        assert!(s.custom_themes().is_empty());
    }

    #[test]
    fn saved_slot_becomes_selectable_and_applies() {
        let mut s = store();
        assert!(!s.set_color_scheme_light("custom_02"), "empty slots are not selectable");

        let (light, dark) = palettes();
        s.save_theme_to_slot("custom_02", "  Ocean ", light.clone(), dark.clone())
            .unwrap();
        assert_eq!(s.custom_theme_names()["custom_02"], "Ocean");
        assert!(s.set_color_scheme_light("custom_02"));
        assert_eq!(s.document().property("--color-accent"), Some("#112233"));
        assert_eq!(s.current_theme_name(), "Ocean");

        let themes = s.custom_themes();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].slot_key, ThemeSlot::Custom02);
        assert_eq!(themes[0].light_colors, light);
        assert_eq!(themes[0].dark_colors, dark);

        let stored: Palette =
            serde_json::from_str(&s.storage.get("agentWorkbench_custom02Light").unwrap()).unwrap();
        assert_eq!(stored, light);
    }

    #[test]
    fn clearing_active_slot_resets_scheme() {
        let mut s = store();
        let (light, dark) = palettes();
        s.save_theme_to_slot("custom_02", "Night", light, dark).unwrap();
        assert!(s.set_color_scheme_dark("custom_02"));
        s.set_dark_mode(true);
        assert_eq!(s.document().property(SECONDARY_SHADOW_VAR), Some("68, 85, 102"));

        s.clear_theme_slot("custom_02").unwrap();
        assert_eq!(s.color_scheme_dark(), ColorScheme::DEFAULT);
        assert_eq!(s.custom_theme_names()["custom_02"], "");
        assert_eq!(
            *s.custom_palette(ThemeSlot::Custom02, ThemeMode::Dark),
            Palette::default_for(ThemeMode::Dark)
        );
        assert_eq!(s.storage.get(storage::COLOR_SCHEME_DARK).as_deref(), Some("default"));
        assert_eq!(s.document().property("--color-bg"), Some("#111827"));
    }

    #[test]
    fn clearing_unknown_slot_is_a_validation_error() {
        let mut s = store();
        assert_eq!(
            s.clear_theme_slot("default"),
            Err(SettingsError::InvalidSlot("default".to_string()))
        );
    }

    #[test]
    fn single_color_edits_persist_and_reapply() {
        let mut s = store();
        let (light, dark) = palettes();
        s.save_theme_to_slot("custom_03", "Edit", light, dark).unwrap();
        s.set_color_scheme_light("custom_03");

        assert!(s.set_custom_theme_color("custom_03", "light", "bg", "#000000"));
        assert_eq!(s.document().property("--color-bg"), Some("#000000"));
        assert!(!s.set_custom_theme_color("custom_03", "light", "glow", "#000000"));
        assert!(!s.set_custom_theme_color("custom_03", "dusk", "bg", "#000000"));
        assert!(!s.set_custom_theme_color("ayu", "light", "bg", "#000000"));
    }

    #[test]
    fn malformed_secondary_keeps_previous_shadow() {
        let mut s = store();
        let (light, dark) = palettes();
        s.save_theme_to_slot("custom_04", "Odd", light, dark).unwrap();
        s.set_color_scheme_light("custom_04");
        let before = s.document().property(SECONDARY_SHADOW_VAR).map(str::to_string);

        s.set_custom_theme_color("custom_04", "light", "btnSecondary", "rebeccapurple");
        assert_eq!(s.document().property("--color-btn-secondary"), Some("rebeccapurple"));
        assert_eq!(s.document().property(SECONDARY_SHADOW_VAR).map(str::to_string), before);
    }

    #[test]
    fn custom_selection_survives_reload() {
        let mut backing = MemoryStore::new();
        backing.set(storage::COLOR_SCHEME_LIGHT, "custom_05".to_string());
        let s = SettingsStore::load(Box::new(backing.clone()));
        assert_eq!(s.color_scheme_light(), ColorScheme::DEFAULT, "unnamed slot falls back");

        backing.set(
            storage::CUSTOM_THEME_NAMES,
            serde_json::json!({"custom_05": "Mine"}).to_string(),
        );
        let s = SettingsStore::load(Box::new(backing));
        assert_eq!(s.color_scheme_light(), ColorScheme::Custom(ThemeSlot::Custom05));
    }
}
