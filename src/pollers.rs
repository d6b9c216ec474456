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

//! Background pollers for the banner/config and the public stats.
//!
//! Each poller is its own thread, fetching once straight away and then on a
//! fixed interval. They know nothing about playback; results are posted to
//! the event loop and failures are only logged.

use std::{fmt::Display, sync::mpsc::Sender, thread, time::Duration};

use tracing::{debug, warn};

use crate::{api::ApiClient, config::SlideshowConfig, events::AppEvent};

pub(crate) fn spawn_pollers(client: &ApiClient, config: &SlideshowConfig, event_tx: &Sender<AppEvent>) {
    let config_client = client.clone();
    spawn_poller(
        "config",
        Duration::from_secs(config.config_poll_secs.max(1)),
        move || config_client.frontend_config(),
        AppEvent::ConfigLoaded,
        event_tx.clone(),
    );

    let stats_client = client.clone();
    spawn_poller(
        "stats",
        Duration::from_secs(config.stats_poll_secs.max(1)),
        move || stats_client.public_stats(),
        AppEvent::StatsLoaded,
        event_tx.clone(),
    );
}

fn spawn_poller<T, E, F, M>(name: &'static str, interval: Duration, mut fetch: F, into_event: M, event_tx: Sender<AppEvent>)
where
    E: Display,
    F: FnMut() -> Result<T, E> + Send + 'static,
    M: Fn(T) -> AppEvent + Send + 'static,
{
    thread::spawn(move || {
        while poll_once(name, &mut fetch, &into_event, &event_tx) {
            thread::sleep(interval);
        }
        debug!(poller = name, "Event loop gone, poller stopping");
    });
}

/// Runs one fetch. Returns `false` once nobody is listening any more.
fn poll_once<T, E, F, M>(name: &str, fetch: &mut F, into_event: &M, event_tx: &Sender<AppEvent>) -> bool
where
    E: Display,
    F: FnMut() -> Result<T, E>,
    M: Fn(T) -> AppEvent,
{
    match fetch() {
        Ok(value) => event_tx.send(into_event(value)).is_ok(),
        Err(e) => {
            warn!(poller = name, error = %e, "Poll failed");
            true
        }
    }
}
