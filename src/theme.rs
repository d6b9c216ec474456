// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the dark and light palettes and provides utilities for
//! converting colors between Ratatui's internal representation and the
//! hexadecimal strings used for terminal emulator styling.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub(crate) fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) mode: ThemeMode,

    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) gauge_track_colour: Color,

    pub(crate) text_fg: Color,
    pub(crate) muted_fg: Color,
    pub(crate) caption_fg: Color,
    pub(crate) author_fg: Color,
    pub(crate) banner_fg: Color,
    pub(crate) error_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub(crate) const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub(crate) const fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            background_colour: Color::Rgb(24, 20, 32),
            accent_colour: Color::Rgb(236, 182, 96),
            border_colour: Color::Rgb(96, 92, 110),
            gauge_track_colour: Color::Rgb(44, 38, 56),

            text_fg: Color::Rgb(240, 236, 244),
            muted_fg: Color::Rgb(150, 146, 160),
            caption_fg: Color::Rgb(255, 255, 255),
            author_fg: Color::Rgb(236, 182, 96),
            banner_fg: Color::Rgb(255, 215, 160),
            error_fg: Color::Rgb(240, 110, 110),
        }
    }

    pub(crate) const fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            background_colour: Color::Rgb(250, 246, 240),
            accent_colour: Color::Rgb(176, 112, 40),
            border_colour: Color::Rgb(196, 188, 176),
            gauge_track_colour: Color::Rgb(232, 224, 212),

            text_fg: Color::Rgb(40, 34, 30),
            muted_fg: Color::Rgb(120, 112, 104),
            caption_fg: Color::Rgb(20, 16, 14),
            author_fg: Color::Rgb(160, 96, 30),
            banner_fg: Color::Rgb(130, 70, 20),
            error_fg: Color::Rgb(190, 40, 40),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string, used to set the terminal emulator's background color via
    /// escape sequences. Non-RGB colors have no hex form.
    pub(crate) fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}
