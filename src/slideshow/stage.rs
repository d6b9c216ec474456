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

//! The live slideshow host.
//!
//! [`LiveHost`] connects the scheduler to the real world: slides go to the
//! MPV display and to the [`Stage`] the terminal UI draws from, feed requests
//! and view notifications go to the task worker, and timers are sleeper
//! threads posting back to the event loop.

use std::{
    sync::mpsc::Sender,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use rand::{rng, seq::IndexedRandom};
use tracing::{debug, warn};

use crate::{
    api::ApiClient,
    events::AppEvent,
    model::{MediaId, MediaItem},
    player::MediaDisplay,
    slideshow::{FeedPort, FeedRequest, RenderHandle, RenderPort, SlideEvent, SlideId, SlideshowHost, Timer},
    tasks::AppTask,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Fade,
    Slide,
    Zoom,
}

const TRANSITIONS: [Transition; 3] = [Transition::Fade, Transition::Slide, Transition::Zoom];

impl Transition {
    pub(crate) fn random() -> Self {
        TRANSITIONS.choose(&mut rng()).copied().unwrap_or(Transition::Fade)
    }
}

/// A slide as the terminal UI sees it.
#[derive(Debug, Clone)]
pub(crate) struct StagedSlide {
    pub(crate) handle: RenderHandle,
    pub(crate) item: MediaItem,
    pub(crate) url: String,
    pub(crate) transition: Transition,
    pub(crate) shown_at: Instant,
}

/// What is on screen: the current slide and the previous ones still fading
/// out.
#[derive(Debug, Default)]
pub(crate) struct Stage {
    current: Option<StagedSlide>,
    outgoing: Vec<StagedSlide>,
}

impl Stage {
    pub(crate) fn present(&mut self, slide: StagedSlide) {
        if let Some(previous) = self.current.replace(slide) {
            self.outgoing.push(previous);
        }
    }

    /// Drops the slide behind `handle`. Returns whether it was the one
    /// currently shown.
    pub(crate) fn dispose(&mut self, handle: RenderHandle) -> bool {
        if self.current.as_ref().is_some_and(|current| current.handle == handle) {
            self.current = None;
            return true;
        }

        self.outgoing.retain(|slide| slide.handle != handle);
        false
    }

    pub(crate) fn show_waiting(&mut self) {
        if let Some(previous) = self.current.take() {
            self.outgoing.push(previous);
        }
    }

    pub(crate) fn current(&self) -> Option<&StagedSlide> {
        self.current.as_ref()
    }

    pub(crate) fn outgoing(&self) -> &[StagedSlide] {
        &self.outgoing
    }

    /// Progress of the current slide's entry transition in `0.0..=1.0`, or
    /// `None` once it has completed.
    pub(crate) fn transition_progress(&self, now: Instant, window: Duration) -> Option<f64> {
        let current = self.current.as_ref()?;
        if window.is_zero() {
            return None;
        }

        let elapsed = now.saturating_duration_since(current.shown_at);
        (elapsed < window).then(|| elapsed.as_secs_f64() / window.as_secs_f64())
    }
}

pub(crate) struct LiveHost {
    stage: Stage,
    display: MediaDisplay,
    client: ApiClient,
    task_tx: Sender<AppTask>,
    event_tx: Sender<AppEvent>,
    next_handle: u64,
}

impl LiveHost {
    pub(crate) fn new(display: MediaDisplay, client: ApiClient, task_tx: Sender<AppTask>, event_tx: Sender<AppEvent>) -> Self {
        Self {
            stage: Stage::default(),
            display,
            client,
            task_tx,
            event_tx,
            next_handle: 0,
        }
    }

    pub(crate) fn stage(&self) -> &Stage {
        &self.stage
    }
}

impl RenderPort for LiveHost {
    fn render_item(&mut self, slide: SlideId, item: &MediaItem) -> Result<RenderHandle> {
        let url = self
            .client
            .media_url(item.display_path())
            .with_context(|| format!("Invalid media path: {}", item.display_path()))?;

        self.display.show(slide, url.as_str(), item.kind)?;

        self.next_handle += 1;
        let handle = RenderHandle(self.next_handle);
        self.stage.present(StagedSlide {
            handle,
            item: item.clone(),
            url: url.into(),
            transition: Transition::random(),
            shown_at: Instant::now(),
        });

        Ok(handle)
    }

    fn dispose(&mut self, handle: RenderHandle) {
        if self.stage.dispose(handle)
            && let Err(e) = self.display.stop()
        {
            warn!(error = %e, "Failed to clear media display");
        }
    }

    fn show_waiting(&mut self) {
        self.stage.show_waiting();
        if let Err(e) = self.display.stop() {
            warn!(error = %e, "Failed to clear media display");
        }
    }
}

impl FeedPort for LiveHost {
    fn request_feed(&mut self, request: FeedRequest) {
        if let Err(e) = self.task_tx.send(AppTask::FetchFeed(request)) {
            warn!(error = %e, "Task worker gone, feed request dropped");
        }
    }
}

impl SlideshowHost for LiveHost {
    fn schedule(&mut self, delay: Duration, timer: Timer) {
        debug!(?timer, delay_ms = delay.as_millis() as u64, "Scheduling timer");

        let event_tx = self.event_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = event_tx.send(AppEvent::Slideshow(SlideEvent::Timer(timer)));
        });
    }

    fn mark_viewed(&mut self, id: MediaId) {
        if let Err(e) = self.task_tx.send(AppTask::MarkViewed(id)) {
            warn!(error = %e, "Task worker gone, view not recorded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::queue::tests::photo;

    fn staged(handle: u64, at: Instant) -> StagedSlide {
        StagedSlide {
            handle: RenderHandle(handle),
            item: photo(handle as i64),
            url: format!("http://localhost/uploads/{handle}.jpg"),
            transition: Transition::Fade,
            shown_at: at,
        }
    }

    #[test]
    fn presenting_moves_previous_slide_to_outgoing() {
        let mut stage = Stage::default();
        let now = Instant::now();

        stage.present(staged(1, now));
        stage.present(staged(2, now));

        assert_eq!(stage.current().map(|slide| slide.handle), Some(RenderHandle(2)));
        assert_eq!(stage.outgoing().len(), 1);
        assert!(!stage.dispose(RenderHandle(1)));
        assert!(stage.outgoing().is_empty());
    }

    #[test]
    fn disposing_current_clears_it() {
        let mut stage = Stage::default();
        stage.present(staged(1, Instant::now()));

        assert!(stage.dispose(RenderHandle(1)));
        assert!(stage.current().is_none());
    }

    #[test]
    fn waiting_notice_replaces_current_until_next_slide() {
        let mut stage = Stage::default();
        let now = Instant::now();
        stage.present(staged(1, now));

        stage.show_waiting();
        assert!(stage.current().is_none());
        assert_eq!(stage.outgoing().len(), 1);

        stage.present(staged(2, now));
        assert_eq!(stage.current().map(|slide| slide.handle), Some(RenderHandle(2)));
    }

    #[test]
    fn transition_progress_runs_over_the_window() {
        let mut stage = Stage::default();
        let start = Instant::now();
        stage.present(staged(1, start));
        let window = Duration::from_millis(1500);

        let halfway = stage.transition_progress(start + Duration::from_millis(750), window).unwrap();
        assert!((halfway - 0.5).abs() < 1e-9);
        assert_eq!(stage.transition_progress(start + window, window), None);
    }

    #[test]
    fn random_transition_is_one_of_the_styles() {
        for _ in 0..20 {
            assert!(TRANSITIONS.contains(&Transition::random()));
        }
    }
}
