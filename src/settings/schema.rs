use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Closed string-valued setting domains. Parsing is the only way in, so
/// anything outside the set is rejected before it reaches the store.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

string_enum!(FontSize {
    Small => "small",
    Medium => "medium",
    Large => "large",
    ExtraLarge => "extra-large",
});

impl FontSize {
    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
            FontSize::ExtraLarge => "Extra Large",
        }
    }

    /// Root font size written to the document.
    pub fn css_value(self) -> &'static str {
        match self {
            FontSize::Small => "0.875rem",
            FontSize::Medium => "1rem",
            FontSize::Large => "1.125rem",
            FontSize::ExtraLarge => "1.25rem",
        }
    }
}

string_enum!(ThemeMode {
    Light => "light",
    Dark => "dark",
});

string_enum!(BuiltinScheme {
    Default => "default",
    Ayu => "ayu",
    Bearded => "bearded",
    Cyberpunk => "cyberpunk",
    Eva => "eva",
    Gruvbox => "gruvbox",
});

impl BuiltinScheme {
    pub fn label(self, mode: ThemeMode) -> &'static str {
        match (self, mode) {
            (BuiltinScheme::Default, _) => "Default Gray",
            (BuiltinScheme::Ayu, ThemeMode::Light) => "Ayu Light",
            (BuiltinScheme::Ayu, ThemeMode::Dark) => "Ayu Dark",
            (BuiltinScheme::Bearded, _) => "Bearded Black & Gold",
            (BuiltinScheme::Cyberpunk, _) => "Cyberpunk Scarlet",
            (BuiltinScheme::Eva, ThemeMode::Light) => "Eva Light",
            (BuiltinScheme::Eva, ThemeMode::Dark) => "Eva Dark",
            (BuiltinScheme::Gruvbox, ThemeMode::Light) => "Gruvbox Light",
            (BuiltinScheme::Gruvbox, ThemeMode::Dark) => "Gruvbox Dark Hard",
        }
    }
}

string_enum!(ThemeSlot {
    Custom01 => "custom_01",
    Custom02 => "custom_02",
    Custom03 => "custom_03",
    Custom04 => "custom_04",
    Custom05 => "custom_05",
    Custom06 => "custom_06",
});

impl ThemeSlot {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Active scheme for one mode: a preset or a user slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Builtin(BuiltinScheme),
    Custom(ThemeSlot),
}

impl ColorScheme {
    pub const DEFAULT: ColorScheme = ColorScheme::Builtin(BuiltinScheme::Default);

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Builtin(scheme) => scheme.as_str(),
            ColorScheme::Custom(slot) => slot.as_str(),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(ColorScheme::Builtin)
            .or_else(|_| s.parse().map(ColorScheme::Custom))
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColorScheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

string_enum!(WindowMode {
    Tab => "tab",
    Window => "window",
});

impl WindowMode {
    pub fn label(self) -> &'static str {
        match self {
            WindowMode::Tab => "New Tab",
            WindowMode::Window => "New Window",
        }
    }
}

string_enum!(SplitDirection {
    Vertical => "vertical",
    Horizontal => "horizontal",
});

impl SplitDirection {
    pub fn label(self) -> &'static str {
        match self {
            SplitDirection::Vertical => "Vertical (Side by Side)",
            SplitDirection::Horizontal => "Horizontal (Top & Bottom)",
        }
    }
}
