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

//! Application event loop and dispatching.
//!
//! Every worker in the application (keys, ticks, slideshow timers, the MPV
//! display, the task worker, uploads and pollers) reports back by posting an
//! [`AppEvent`]. The loop here is the only place application state is
//! mutated, one event at a time, with a redraw after each.

mod handlers;
use handlers::*;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    commander::{Command, CommandError},
    model::{AdminStats, FrontendConfig, MediaId, ModerationAction, MyUpload, PublicStats},
    render::draw,
    slideshow::SlideEvent,
    upload::UploadEvent,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    RunCommand(Command),
    CommandFailed(CommandError),

    Slideshow(SlideEvent),

    ConfigLoaded(FrontendConfig),
    StatsLoaded(PublicStats),
    AdminStatsLoaded(AdminStats),

    MyUploadsLoaded(Vec<MyUpload>),
    Upload(UploadEvent),
    MediaDeleted(MediaId),
    Moderated(MediaId, ModerationAction),
    Purged,

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed. A fatal error ends the loop with that error.
pub(crate) fn process_events(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::FatalError(message) => return Err(anyhow!(message)),

            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::RunCommand(command) => handle_command(app, command)?,
            AppEvent::CommandFailed(error) => handle_command_failed(app, error),

            AppEvent::Slideshow(event) => handle_slideshow_event(app, event),

            AppEvent::ConfigLoaded(config) => handle_config_loaded(app, config),
            AppEvent::StatsLoaded(stats) => handle_stats_loaded(app, stats),
            AppEvent::AdminStatsLoaded(stats) => handle_admin_stats_loaded(app, stats),

            AppEvent::MyUploadsLoaded(uploads) => handle_my_uploads_loaded(app, uploads),
            AppEvent::Upload(event) => handle_upload_event(app, event)?,
            AppEvent::MediaDeleted(id) => handle_media_deleted(app, id)?,
            AppEvent::Moderated(id, action) => handle_moderated(app, id, action),
            AppEvent::Purged => handle_purged(app),

            AppEvent::Error(message) => handle_error(app, message),
            AppEvent::Tick => handle_tick(app),
        }

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}

/// Maps keyboard input to application commands.
///
/// The command line gets first refusal; anything it does not consume is a
/// single-key shortcut for one of the [`Command`]s.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if app.commander.handle_event(Event::Key(key), &app.event_tx)? {
        return Ok(());
    }

    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => Command::Quit,
        (KeyCode::Char('n'), _) | (KeyCode::Right, _) => Command::Next,
        (KeyCode::Char('o'), _) => Command::Order(None),
        (KeyCode::Char('l'), _) => Command::Lang(None),
        (KeyCode::Char('t'), _) => Command::Theme(None),
        (KeyCode::Char('u'), _) => return handle_toggle_side_panel(app),
        _ => return Ok(()),
    };

    handle_command(app, command)
}
