//! Process-wide preferences.
//!
//! Settings are explicit state: callers `init` them once from storage and pass
//! them where needed. Every change is written through to the `settings` slot.

use crate::error::Result;
use crate::store::{Persistence, SlotState, StorageBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// The OS preference, when there is no stored one.
    pub fn detect() -> Self {
        match dark_light::detect() {
            dark_light::Mode::Light => Theme::Light,
            dark_light::Mode::Dark => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredSettings {
    theme: Theme,
}

pub struct Settings<B: StorageBackend> {
    persistence: Persistence<B>,
    theme: Theme,
    origin: SlotState,
}

impl<B: StorageBackend> Settings<B> {
    /// Read the stored preferences, asking the OS for anything not stored.
    pub fn init(backend: B) -> Self {
        Self::init_with(backend, Theme::detect)
    }

    pub fn init_with<F: FnOnce() -> Theme>(backend: B, fallback: F) -> Self {
        let persistence = Persistence::new(backend);
        let (stored, origin) = persistence.load_value(SETTINGS_KEY, || StoredSettings {
            theme: fallback(),
        });
        Self {
            persistence,
            theme: stored.theme,
            origin,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the theme came from storage rather than the OS.
    pub fn is_stored(&self) -> bool {
        self.origin == SlotState::Stored
    }

    /// Change the theme. The new value is kept even if saving fails.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.persistence
            .save_value(SETTINGS_KEY, &StoredSettings { theme })?;
        self.origin = SlotState::Stored;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
