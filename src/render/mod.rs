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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every application event, including the periodic tick that animates slide
//! transitions.

mod commander;
mod icons;
mod side;
mod slide;
mod status;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Paragraph},
};

use crate::{
    App,
    render::{commander::draw_commander, side::draw_side_panel, slide::draw_slide, status::draw_status},
};

const SIDE_PANEL_WIDTH: u16 = 44;

/// Renders the user interface to the terminal frame.
///
/// It handles:
///
/// * **Layout**: Partitioning the screen into the banner, the slide and side
///   panels, the status line and the command line.
/// * **State Mapping**: Converting the slideshow stage, queue and backend
///   data into widgets.
/// * **Styling**: Applying colours defined in the active theme.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(app.theme.background_colour)), area);

    let banner = app.language.banner(&app.frontend_config);

    // Outer layout: banner, main, status, command line
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if banner.is_some() { 1 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    if let Some(banner) = banner {
        f.render_widget(
            Paragraph::new(banner)
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.banner_fg).add_modifier(Modifier::BOLD)),
            outer[0],
        );
    }

    // Main layout: slide, side panel
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(outer[1]);

    draw_slide(f, main[0], app);
    draw_side_panel(f, main[1], app);

    draw_status(f, outer[2], app);

    draw_commander(f, outer[3], app);
}
