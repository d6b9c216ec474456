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

use std::{path::PathBuf, thread};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    events::AppEvent,
    guest::GuestIdentity,
    model::{FrontendConfig, MediaId, ModerationAction},
    slideshow::{FeedRequest, SlideEvent},
    tasks::TaskContext,
    upload,
};

pub(super) fn fetch_feed(ctx: &mut TaskContext, request: FeedRequest) -> Result<()> {
    let result = ctx.client.feed(&request.query).map_err(|e| e.to_string());
    ctx.event_tx
        .send(AppEvent::Slideshow(SlideEvent::FeedLoaded { request, result }))?;

    Ok(())
}

/// Best effort, and sent from its own thread so feed requests never queue
/// behind a slow view count.
pub(super) fn mark_viewed(ctx: &mut TaskContext, id: MediaId) -> Result<()> {
    let client = ctx.client.clone();
    thread::spawn(move || {
        if let Err(e) = client.mark_viewed(id) {
            debug!(%id, error = %e, "Failed to record view");
        }
    });

    Ok(())
}

pub(super) fn set_identity(ctx: &mut TaskContext, identity: Option<GuestIdentity>) -> Result<()> {
    ctx.client.set_identity(identity);

    Ok(())
}

pub(super) fn load_my_uploads(ctx: &mut TaskContext) -> Result<()> {
    if ctx.client.identity().is_none() {
        ctx.event_tx.send(AppEvent::MyUploadsLoaded(vec![]))?;
        return Ok(());
    }

    let uploads = ctx.client.my_uploads().context("Failed to load your uploads")?;
    ctx.event_tx.send(AppEvent::MyUploadsLoaded(uploads))?;

    Ok(())
}

pub(super) fn upload(
    ctx: &mut TaskContext,
    path: PathBuf,
    caption: Option<String>,
    limits: FrontendConfig,
) -> Result<()> {
    upload::spawn_upload(ctx.client.clone(), path, caption, limits, ctx.event_tx.clone());

    Ok(())
}

pub(super) fn delete_media(ctx: &mut TaskContext, id: MediaId) -> Result<()> {
    ctx.client.delete_media(id).context("Delete failed")?;
    info!(%id, "Deleted upload");
    ctx.event_tx.send(AppEvent::MediaDeleted(id))?;

    Ok(())
}

pub(super) fn moderate(ctx: &mut TaskContext, id: MediaId, action: ModerationAction) -> Result<()> {
    ctx.client
        .moderate(id, action)
        .with_context(|| format!("Failed to {} media {}", action.as_str(), id))?;
    info!(%id, action = action.as_str(), "Moderated media");
    ctx.event_tx.send(AppEvent::Moderated(id, action))?;

    Ok(())
}

pub(super) fn load_admin_stats(ctx: &mut TaskContext) -> Result<()> {
    let stats = ctx.client.admin_stats().context("Failed to load admin stats")?;
    ctx.event_tx.send(AppEvent::AdminStatsLoaded(stats))?;

    Ok(())
}

pub(super) fn purge(ctx: &mut TaskContext, pin: &str) -> Result<()> {
    ctx.client.purge(pin).context("Purge failed")?;
    info!("Purged all event media");
    ctx.event_tx.send(AppEvent::Purged)?;

    Ok(())
}
