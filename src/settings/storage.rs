use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::schema::{ThemeMode, ThemeSlot};

pub const FONT_SIZE: &str = "agentWorkbench_fontSize";
pub const COLOR_SCHEME_LIGHT: &str = "agentWorkbench_colorSchemeLight";
pub const COLOR_SCHEME_DARK: &str = "agentWorkbench_colorSchemeDark";
pub const CUSTOM_THEME_NAMES: &str = "agentWorkbench_customThemeNames";
pub const TERMINAL_WINDOW_MODE: &str = "agentWorkbench_terminalWindowMode";
pub const TERMINAL_SPLIT_DIRECTION: &str = "agentWorkbench_terminalSplitDirection";
pub const TERMINAL_SHOW_SPLIT: &str = "agentWorkbench_terminalShowSplit";
pub const TERMINAL_WINDOW_WIDTH: &str = "agentWorkbench_terminalWindowWidth";
pub const TERMINAL_WINDOW_HEIGHT: &str = "agentWorkbench_terminalWindowHeight";

/// Key holding one slot's palette for one mode, e.g. `agentWorkbench_custom03Dark`.
pub fn slot_palette_key(slot: ThemeSlot, mode: ThemeMode) -> String {
    let suffix = match mode {
        ThemeMode::Light => "Light",
        ThemeMode::Dark => "Dark",
    };
    format!("agentWorkbench_custom{:02}{}", slot.index() + 1, suffix)
}

/// Flat string-to-string persistence, one value per settings key.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// All keys in one JSON object on disk, rewritten on every `set`.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// A missing file starts empty; an unreadable one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed settings file '{}': {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;

        // Replace the file in one rename so a crash never leaves it half-written.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            warn!("Failed to persist '{}' to '{}': {}", key, self.path.display(), e);
        }
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_follow_storage_layout() {
        assert_eq!(
            slot_palette_key(ThemeSlot::Custom01, ThemeMode::Light),
            "agentWorkbench_custom01Light"
        );
        assert_eq!(
            slot_palette_key(ThemeSlot::Custom06, ThemeMode::Dark),
            "agentWorkbench_custom06Dark"
        );
    }

    #[test]
    fn json_store_persists_every_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(FONT_SIZE), None);
        store.set(FONT_SIZE, "large".to_string());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(FONT_SIZE).as_deref(), Some("large"));
    }

    #[test]
    fn json_store_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, "{half").unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set(FONT_SIZE, "small".to_string());
        store.set(TERMINAL_WINDOW_WIDTH, "1200".to_string());

        assert!(!tmp.exists());
        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.get(FONT_SIZE).map(String::as_str), Some("small"));
        assert_eq!(on_disk.get(TERMINAL_WINDOW_WIDTH).map(String::as_str), Some("1200"));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("settings.json")]);
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(FONT_SIZE), None);
    }
}
