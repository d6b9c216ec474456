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

//! MPV-backed display worker and event processing.
//!
//! The worker owns the `libmpv` handle. Commands arrive on one channel and
//! MPV lifecycle events are translated into [`MediaEvent`]s tagged with the
//! slide they belong to, so the scheduler can discard anything stale.
//!
//! Photos are shown with `image-display-duration=inf`: they never end on
//! their own and the scheduler's timer moves the show on. Videos report
//! their measured duration when loaded and an end event at EOF.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    config::PlayerConfig,
    events::AppEvent,
    model::MediaKind,
    slideshow::{MediaEvent, SlideEvent, SlideId},
};

#[derive(Debug)]
pub(crate) enum DisplayCommand {
    Show { slide: SlideId, url: String, kind: MediaKind },
    Stop,
}

/// Tracks which slide the MPV file events refer to.
///
/// `loadfile ... replace` first ends the old file, then starts the new one;
/// a file that fails to open ends without ever being loaded.
#[derive(Debug, Default)]
struct Playing {
    requested: Option<(SlideId, MediaKind)>,
    starting: Option<(SlideId, MediaKind)>,
    loaded: Option<(SlideId, MediaKind)>,
}

/// Spawns the display worker thread.
///
/// If the worker fails, for example because no MPV window can be created,
/// the error is broadcast as a fatal application event.
pub(crate) fn spawn_display_worker(config: PlayerConfig, command_rx: Receiver<DisplayCommand>, event_tx: Sender<AppEvent>) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = display_worker(&config, command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

fn display_worker(config: &PlayerConfig, command_rx: Receiver<DisplayCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        if let Some(vo) = &config.video_output {
            builder.set_option("vo", vo.as_str()).context("Failed to set video output")?;
        }
        builder
            .set_option("fullscreen", if config.fullscreen { "yes" } else { "no" })
            .context("Failed to set fullscreen")?;
        builder
            .set_option("mute", if config.mute { "yes" } else { "no" })
            .context("Failed to set mute")?;
        builder
            .set_option("image-display-duration", "inf")
            .context("Failed to set image display duration")?;
        builder.set_option("force-window", "yes").context("Failed to force window")?;
        builder.set_option("idle", "yes").context("Failed to set idle")?;
        builder.set_option("keep-open", "no").context("Failed to set keep-open")?;
        builder.set_option("osc", "no").context("Failed to disable OSC")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    info!(fullscreen = config.fullscreen, "Media display ready");

    let mut playing = Playing::default();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut playing)? {
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut playing, &event_tx)?;
    }
}

/// Drains and executes all pending commands. Returns `false` once the
/// application side has gone away.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<DisplayCommand>,
    playing: &mut Playing,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(std::sync::mpsc::TryRecvError::Empty) => return Ok(true),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => return Ok(false),
        };

        match command {
            DisplayCommand::Show { slide, url, kind } => {
                debug!(slide, %url, "Loading media");
                handler
                    .command(&["loadfile", &url, "replace"])
                    .context(format!("Failed to load file: {}", &url))?;
                handler.set_property("pause", false)?;
                playing.requested = Some((slide, kind));
            }
            DisplayCommand::Stop => {
                handler.command(&["stop"])?;
                *playing = Playing::default();
            }
        }
    }
}

/// Polls for MPV events, waiting up to 50ms, and forwards the ones that
/// concern the slideshow.
fn process_mpv_events(handler: &mut mpv::MpvHandler, playing: &mut Playing, event_tx: &Sender<AppEvent>) -> Result<()> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    let media_event = match mpv_event {
        mpv::Event::StartFile => {
            playing.starting = playing.requested.take();
            None
        }
        mpv::Event::FileLoaded => playing.starting.take().map(|(slide, kind)| {
            playing.loaded = Some((slide, kind));
            MediaEvent::Loaded { slide, duration: None }
        }),
        mpv::Event::EndFile(result) => {
            let current = playing.starting.take().or_else(|| playing.loaded.take());
            match (current, result) {
                (Some((slide, _)), Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => Some(MediaEvent::Ended { slide }),
                (Some((slide, _)), Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR)) => Some(MediaEvent::Failed {
                    slide,
                    reason: "MPV could not play the file".to_string(),
                }),
                (Some((slide, _)), Err(e)) => Some(MediaEvent::Failed {
                    slide,
                    reason: format!("{:?}", e),
                }),
                _ => None,
            }
        }
        _ => None,
    };

    // Only videos have a meaningful length; a photo's is reported as zero.
    let media_event = match media_event {
        Some(MediaEvent::Loaded { slide, .. }) if matches!(playing.loaded, Some((_, MediaKind::Video))) => {
            Some(MediaEvent::Loaded {
                slide,
                duration: handler.get_property::<f64>("duration").ok(),
            })
        }
        other => other,
    };

    if let Some(event) = media_event {
        if matches!(event, MediaEvent::Failed { .. }) {
            warn!(?event, "Media display error");
        }
        event_tx
            .send(AppEvent::Slideshow(SlideEvent::Media(event)))
            .context("Failed to send media event")?;
    }

    Ok(())
}
