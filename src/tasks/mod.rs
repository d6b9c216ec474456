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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to keep blocking backend
//! calls off the event loop. A dedicated worker owns the [`ApiClient`],
//! translates [`AppTask`] requests into HTTP calls and posts the results back
//! to the application as [`AppEvent`]s.
//!
//! Only actions that touch the network belong here. Uploads and view
//! notifications are handed to their own threads from this worker so they
//! never delay feed requests.

mod handlers;
use handlers::*;

use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;

use crate::{
    api::ApiClient,
    events::AppEvent,
    guest::GuestIdentity,
    model::{FrontendConfig, MediaId, ModerationAction},
    slideshow::FeedRequest,
};

#[derive(Debug)]
pub(crate) enum AppTask {
    FetchFeed(FeedRequest),
    MarkViewed(MediaId),

    SetIdentity(Option<GuestIdentity>),
    LoadMyUploads,
    Upload {
        path: PathBuf,
        caption: Option<String>,
        limits: FrontendConfig,
    },
    DeleteMedia(MediaId),

    Moderate(MediaId, ModerationAction),
    LoadAdminStats,
    Purge(String),
}

/// Spawns a background thread to process application tasks.
///
/// # Arguments
///
/// * `client` - The backend client, owned by the worker from here on.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(client: ApiClient, task_rx: Receiver<AppTask>, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let mut client = client;

        while let Ok(task) = task_rx.recv() {
            let mut ctx = TaskContext {
                client: &mut client,
                event_tx: &event_tx,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    client: &'a mut ApiClient,
    event_tx: &'a Sender<AppEvent>,
}

/// Dispatches a single task to its handler.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::FetchFeed(request) => fetch_feed(ctx, request),
        AppTask::MarkViewed(id) => mark_viewed(ctx, id),

        AppTask::SetIdentity(identity) => set_identity(ctx, identity),
        AppTask::LoadMyUploads => load_my_uploads(ctx),
        AppTask::Upload { path, caption, limits } => upload(ctx, path, caption, limits),
        AppTask::DeleteMedia(id) => delete_media(ctx, id),

        AppTask::Moderate(id, action) => moderate(ctx, id, action),
        AppTask::LoadAdminStats => load_admin_stats(ctx),
        AppTask::Purge(pin) => purge(ctx, &pin),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::TcpListener,
        sync::mpsc,
        time::{Duration, Instant},
    };

    use super::*;

    #[test]
    fn queued_tasks_are_not_held_up_by_unanswered_view_notifications() {
        // Connections land in the backlog and are never answered.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let client = ApiClient::new(&url, None, Duration::from_secs(5)).unwrap();
        let (task_tx, task_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        spawn_task_worker(client, task_rx, event_tx);

        let started = Instant::now();
        for id in 1..=4 {
            task_tx.send(AppTask::MarkViewed(MediaId(id))).unwrap();
        }
        // Answered locally when no guest is signed in.
        task_tx.send(AppTask::LoadMyUploads).unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        assert!(matches!(event, AppEvent::MyUploadsLoaded(uploads) if uploads.is_empty()));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
