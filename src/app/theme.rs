//! Light/dark theme: the persisted mode and the colour palette it selects.

use ratatui::style::Color;
use tracing::{info, warn};

use super::settings::SettingsStore;

/// Settings key holding the theme mode.
pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Read the stored mode; missing or unknown values mean dark.
    pub fn load(store: &dyn SettingsStore) -> Self {
        store
            .get(THEME_KEY)
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Persist this mode. A failed write is logged and otherwise ignored.
    pub fn store(self, store: &mut dyn SettingsStore) {
        match store.set(THEME_KEY, self.as_str()) {
            Ok(()) => info!(theme = self.as_str(), "theme: saved"),
            Err(e) => warn!(theme = self.as_str(), error = %e, "theme: could not persist"),
        }
    }
}

/// Colour palette for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
    pub skeleton: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::latte(),
            ThemeMode::Dark => Self::mocha(),
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            skeleton: Color::Rgb(0x31, 0x32, 0x44),     // surface0
        }
    }

    /// Catppuccin Latte.
    pub fn latte() -> Self {
        Self {
            text: Color::Rgb(0x4c, 0x4f, 0x69),         // text
            muted: Color::Rgb(0x8c, 0x8f, 0xa1),        // overlay1
            title: Color::Rgb(0x88, 0x39, 0xef),        // mauve
            border: Color::Rgb(0xac, 0xb0, 0xbe),       // surface2
            header_bg: Color::Rgb(0xcc, 0xd0, 0xda),    // surface0
            header_fg: Color::Rgb(0x72, 0x87, 0xfd),    // lavender
            status_bg: Color::Rgb(0xbc, 0xc0, 0xcc),    // surface1
            status_fg: Color::Rgb(0x4c, 0x4f, 0x69),    // text
            highlight_fg: Color::Rgb(0xdf, 0x8e, 0x1d), // yellow
            highlight_bg: Color::Rgb(0xe6, 0xe9, 0xef), // mantle
            error: Color::Rgb(0xd2, 0x0f, 0x39),        // red
            success: Color::Rgb(0x40, 0xa0, 0x2b),      // green
            skeleton: Color::Rgb(0xdc, 0xe0, 0xe8),     // crust
        }
    }
}
