//! Colors for the recordz CLI.
//!
//! Printers never name a color directly. They ask the [`Palette`] for a
//! semantic role (an id, a badge, muted metadata, a warning), and the palette
//! resolves it for the active [`Theme`]. The theme comes from the stored
//! `settings` slot, or from the OS when nothing is stored, so
//! `recordz theme light` changes every later listing.
//!
//! The roles are:
//!
//!     * Id (record ids in lists and views)
//!     * Badge (filterable values next to the headline)
//!     * Muted (timestamps, info messages, labels)
//!     * Success / warning / error messages
//!     * Bar (filled part of a goal progress bar)
//!
//! The light palette never uses yellow or cyan for text.

use colored::{Color, ColoredString, Colorize};
use recordz::settings::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub id: Color,
    pub badge: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub bar: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => build_light_palette(),
            Theme::Dark => build_dark_palette(),
        }
    }

    pub fn id(&self, text: &str) -> ColoredString {
        text.color(self.id)
    }

    pub fn badge(&self, text: &str) -> ColoredString {
        text.color(self.badge)
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        text.color(self.muted)
    }

    pub fn success(&self, text: &str) -> ColoredString {
        text.color(self.success)
    }

    pub fn warning(&self, text: &str) -> ColoredString {
        text.color(self.warning)
    }

    pub fn error(&self, text: &str) -> ColoredString {
        text.color(self.error)
    }

    pub fn bar(&self, text: &str) -> ColoredString {
        text.color(self.bar)
    }
}

fn build_light_palette() -> Palette {
    Palette {
        id: Color::Blue,
        badge: Color::Magenta,
        muted: Color::TrueColor {
            r: 115,
            g: 115,
            b: 115,
        },
        success: Color::Green,
        warning: Color::TrueColor {
            r: 175,
            g: 95,
            b: 0,
        },
        error: Color::Red,
        bar: Color::Green,
    }
}

fn build_dark_palette() -> Palette {
    Palette {
        id: Color::Yellow,
        badge: Color::Cyan,
        muted: Color::TrueColor {
            r: 140,
            g: 140,
            b: 140,
        },
        success: Color::BrightGreen,
        warning: Color::BrightYellow,
        error: Color::BrightRed,
        bar: Color::BrightGreen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_resolve_to_different_palettes() {
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light, dark);
        assert_eq!(dark.id, Color::Yellow);
    }

    #[test]
    fn light_palette_avoids_pale_accents() {
        let light = Palette::for_theme(Theme::Light);
        for color in [light.id, light.badge, light.warning] {
            assert!(!matches!(
                color,
                Color::Yellow | Color::BrightYellow | Color::Cyan | Color::BrightCyan
            ));
        }
    }

    #[test]
    fn roles_use_their_palette_color() {
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(palette.id("1-0"), "1-0".color(Color::Blue));
        assert_eq!(palette.badge("High"), "High".color(Color::Magenta));
    }
}
