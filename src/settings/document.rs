use serde::Serialize;
use std::collections::BTreeMap;

use super::schema::ThemeMode;

/// What the renderer applies to its document root: the light/dark flag it
/// reported, the root font size, and the named color variables.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    pub dark: bool,
    pub font_size: Option<String>,
    pub variables: BTreeMap<String, String>,
}

impl DocumentStyle {
    pub fn mode(&self) -> ThemeMode {
        if self.dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn set_property(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}
