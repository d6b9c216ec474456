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

//! Media display control.
//!
//! This module provides the [`MediaDisplay`] handle used by the slideshow
//! stage to put photos and videos on screen. It manages a background worker
//! thread that owns an MPV window, so loading media never blocks the main
//! application thread.

mod commands;

use std::sync::mpsc;

use anyhow::Result;

use crate::{
    config::PlayerConfig, events::AppEvent, model::MediaKind, player::commands::DisplayCommand,
    slideshow::SlideId,
};

/// A handle to the media display.
///
/// This struct acts as a command proxy; it does not decode anything itself
/// but sends instructions to the background worker thread, which reports
/// back through [`AppEvent::Slideshow`].
pub(crate) struct MediaDisplay {
    command_tx: mpsc::Sender<DisplayCommand>,
}

impl MediaDisplay {
    /// Spawns the display worker thread and returns a new handle.
    ///
    /// # Arguments
    ///
    /// * `config` - Window and output settings for MPV.
    /// * `event_tx` - A channel to send load, end and failure notifications
    ///   back to the main event loop.
    pub(crate) fn new(config: &PlayerConfig, event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<DisplayCommand>();

        commands::spawn_display_worker(config.clone(), command_rx, event_tx);

        Ok(Self { command_tx })
    }

    /// Replaces whatever is on screen with the media at `url`.
    pub(crate) fn show(&self, slide: SlideId, url: &str, kind: MediaKind) -> Result<()> {
        self.command_tx.send(DisplayCommand::Show {
            slide,
            url: url.to_string(),
            kind,
        })?;
        Ok(())
    }

    /// Clears the screen.
    pub(crate) fn stop(&self) -> Result<()> {
        self.command_tx.send(DisplayCommand::Stop)?;
        Ok(())
    }
}
