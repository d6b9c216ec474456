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

//! Unicode symbols for the TUI.
//!
//! Selected for compatibility with most modern terminal emulators and fonts.

use crate::model::MediaKind;

pub(crate) const ICON_LIVE: &str = "\u{25CF}";
pub(crate) const ICON_VIDEO: &str = "\u{25B6}";
pub(crate) const ICON_PHOTO: &str = "\u{25A3}";
pub(crate) const ICON_STAR: &str = "\u{2605}";
pub(crate) const ICON_UPLOAD: &str = "\u{2191}";

// Text-style variant (using Variation Selector-15 [\u{FE0E}]), this forces
// terminals to render the icon as monochrome text rather than a colourful
// emoji, ensuring it respects the TUI's colour styling.
pub(crate) const ICON_WARNING: &str = "\u{26A0}\u{FE0E}";

pub(crate) fn kind_icon(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Photo => ICON_PHOTO,
        MediaKind::Video => ICON_VIDEO,
    }
}
