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

//! Slideshow playback engine.
//!
//! The [`Scheduler`] owns the media queue and drives an endless show over it.
//! It is a plain state machine: every input (feed responses, timers, media
//! display notifications) arrives as a [`SlideEvent`] on the application
//! event loop, and every side effect leaves through the [`SlideshowHost`]
//! port. This keeps the scheduling rules independent from the terminal and
//! from MPV.
//!
//! # States
//!
//! * [`PlaybackState::Idle`]: no queue yet, the initial load may be in flight.
//! * [`PlaybackState::Displaying`]: a slide is on screen with exactly one
//!   pending advance timer.
//! * [`PlaybackState::Retrying`]: the feed was empty, failed, or every item
//!   was evicted; a retry timer will reload it.
//!
//! # Cancellation
//!
//! Each displayed slide gets a fresh [`SlideId`]. Advance timers and media
//! notifications carry the id (timers also carry a token, bumped whenever
//! the timer is rescheduled) and are ignored unless they match the slide on
//! screen. Retry timers and feed responses carry the reset epoch. A stale
//! callback can therefore never advance the show twice.

pub(crate) mod fetcher;
pub(crate) mod stage;
pub(crate) mod timing;

use std::{mem, time::Duration};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    model::{FeedOrder, FeedPage, FeedQuery, MediaId, MediaItem, queue::MediaQueue},
    slideshow::{fetcher::FetchAgent, timing::SlideTiming},
};

/// Identity of one display transition.
pub(crate) type SlideId = u64;

/// Opaque handle returned by the render port for a rendered slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RenderHandle(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedPurpose {
    Initial,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedRequest {
    pub(crate) purpose: FeedPurpose,
    pub(crate) query: FeedQuery,
    pub(crate) epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Timer {
    Advance { slide: SlideId, token: u32 },
    Retry { epoch: u64 },
    Dispose(RenderHandle),
}

/// Notifications from the media display about the slide it is showing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MediaEvent {
    Loaded { slide: SlideId, duration: Option<f64> },
    Ended { slide: SlideId },
    Failed { slide: SlideId, reason: String },
}

#[derive(Debug)]
pub(crate) enum SlideEvent {
    FeedLoaded {
        request: FeedRequest,
        result: Result<FeedPage, String>,
    },
    Timer(Timer),
    Media(MediaEvent),
}

/// Capability to put media on screen.
pub(crate) trait RenderPort {
    fn render_item(&mut self, slide: SlideId, item: &MediaItem) -> Result<RenderHandle>;
    fn dispose(&mut self, handle: RenderHandle);
    fn show_waiting(&mut self);
}

/// Capability to fetch a page of the feed; the answer comes back later as
/// [`SlideEvent::FeedLoaded`].
pub(crate) trait FeedPort {
    fn request_feed(&mut self, request: FeedRequest);
}

/// Everything the scheduler needs from the outside world.
pub(crate) trait SlideshowHost: RenderPort + FeedPort {
    fn schedule(&mut self, delay: Duration, timer: Timer);
    fn mark_viewed(&mut self, id: MediaId);
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slide {
    pub(crate) id: SlideId,
    pub(crate) item: MediaItem,
    pub(crate) handle: RenderHandle,
    token: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlaybackState {
    Idle,
    Displaying(Slide),
    Retrying,
}

pub(crate) struct Scheduler<H: SlideshowHost> {
    host: H,
    timing: SlideTiming,
    order: FeedOrder,
    queue: MediaQueue,
    fetcher: FetchAgent,
    state: PlaybackState,
    outgoing: Vec<RenderHandle>,
    epoch: u64,
    next_slide: SlideId,
    initial_pending: bool,
    running: bool,
}

impl<H: SlideshowHost> Scheduler<H> {
    pub(crate) fn new(host: H, timing: SlideTiming, order: FeedOrder) -> Self {
        Self {
            host,
            timing,
            order,
            queue: MediaQueue::new(),
            fetcher: FetchAgent::new(timing.refresh_limit),
            state: PlaybackState::Idle,
            outgoing: Vec::new(),
            epoch: 0,
            next_slide: 0,
            initial_pending: false,
            running: false,
        }
    }

    /// Starts the show by requesting the initial feed page.
    pub(crate) fn start(&mut self) {
        if self.running {
            return;
        }

        info!(order = self.order.as_str(), "Starting slideshow");
        self.running = true;
        self.load_initial();
    }

    /// Stops the show, releasing everything on screen. Later events are
    /// ignored until [`start`](Self::start) is called again.
    pub(crate) fn dispose(&mut self) {
        self.clear();
        self.running = false;
    }

    /// Discards the queue and all pending work, then reseeds it with the
    /// given playback order.
    pub(crate) fn reset(&mut self, order: FeedOrder) {
        info!(order = order.as_str(), "Resetting slideshow");
        self.clear();
        self.order = order;

        if self.running {
            self.load_initial();
        }
    }

    /// Moves on to the next slide straight away.
    pub(crate) fn skip(&mut self) {
        if self.running && matches!(self.state, PlaybackState::Displaying(_)) {
            self.advance();
        }
    }

    pub(crate) fn handle(&mut self, event: SlideEvent) {
        if !self.running {
            return;
        }

        match event {
            SlideEvent::FeedLoaded { request, result } => self.on_feed_loaded(request, result),
            SlideEvent::Timer(timer) => self.on_timer(timer),
            SlideEvent::Media(media) => self.on_media(media),
        }
    }

    pub(crate) fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub(crate) fn queue(&self) -> &MediaQueue {
        &self.queue
    }

    pub(crate) fn order(&self) -> FeedOrder {
        self.order
    }

    pub(crate) fn timing(&self) -> &SlideTiming {
        &self.timing
    }

    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    fn clear(&mut self) {
        self.epoch += 1;

        if let PlaybackState::Displaying(slide) = mem::replace(&mut self.state, PlaybackState::Idle) {
            self.host.dispose(slide.handle);
        }
        for handle in self.outgoing.drain(..) {
            self.host.dispose(handle);
        }

        self.fetcher.reset();
        self.queue = MediaQueue::new();
        self.initial_pending = false;
    }

    fn load_initial(&mut self) {
        self.state = PlaybackState::Idle;
        if self.initial_pending {
            return;
        }

        self.initial_pending = true;
        self.host.request_feed(FeedRequest {
            purpose: FeedPurpose::Initial,
            query: FeedQuery {
                limit: self.timing.initial_limit,
                cursor: None,
                order: self.order,
            },
            epoch: self.epoch,
        });
    }

    fn enter_retrying(&mut self, delay: Duration) {
        if let PlaybackState::Displaying(slide) = mem::replace(&mut self.state, PlaybackState::Retrying) {
            self.host.dispose(slide.handle);
        }

        info!(delay_ms = delay.as_millis() as u64, "Nothing to show, retrying");
        self.host.show_waiting();
        self.host.schedule(delay, Timer::Retry { epoch: self.epoch });
    }

    fn on_feed_loaded(&mut self, request: FeedRequest, result: Result<FeedPage, String>) {
        if request.epoch != self.epoch {
            debug!(epoch = request.epoch, "Dropping feed response from before reset");
            return;
        }

        match request.purpose {
            FeedPurpose::Initial => {
                self.initial_pending = false;
                if !matches!(self.state, PlaybackState::Idle) {
                    return;
                }

                match result {
                    Ok(page) if !page.items.is_empty() => {
                        info!(items = page.items.len(), "Initial feed loaded");
                        self.queue.initialize(page.items);
                        self.advance();
                    }
                    Ok(_) => self.enter_retrying(self.timing.load_retry),
                    Err(e) => {
                        warn!(error = %e, "Initial feed load failed");
                        self.enter_retrying(self.timing.load_retry);
                    }
                }
            }
            FeedPurpose::Refresh => {
                self.fetcher.complete(&mut self.queue, result);
            }
        }
    }

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Advance { slide, token } => {
                if self.is_current(slide) && self.current_token() == Some(token) {
                    self.advance();
                }
            }
            Timer::Retry { epoch } => {
                if epoch == self.epoch && self.state == PlaybackState::Retrying {
                    self.load_initial();
                }
            }
            Timer::Dispose(handle) => {
                if let Some(position) = self.outgoing.iter().position(|h| *h == handle) {
                    self.outgoing.remove(position);
                    self.host.dispose(handle);
                }
            }
        }
    }

    fn on_media(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Loaded { slide, duration } => {
                if self.is_current(slide) {
                    self.on_duration_measured(duration);
                }
            }
            MediaEvent::Ended { slide } => {
                if self.is_current(slide) {
                    self.advance();
                }
            }
            MediaEvent::Failed { slide, reason } => {
                if self.is_current(slide) {
                    if let Some(item) = self.queue.remove_current() {
                        warn!(id = %item.id, url = %item.url, %reason, "Media failed to load, evicting");
                    }
                    self.advance();
                }
            }
        }
    }

    /// A video whose length was unknown when it started gets its advance
    /// timer replaced by one matching the measured duration.
    fn on_duration_measured(&mut self, duration: Option<f64>) {
        let PlaybackState::Displaying(slide) = &mut self.state else {
            return;
        };
        let Some(seconds) = duration else {
            return;
        };
        if !slide.item.is_video() || slide.item.duration.is_some() {
            return;
        }

        slide.item.duration = Some(seconds);
        slide.token += 1;
        if let Some(item) = self.queue.current_mut() {
            item.duration = Some(seconds);
        }

        let delay = self.timing.video_delay(Some(seconds));
        debug!(slide = slide.id, delay_ms = delay.as_millis() as u64, "Rescheduling video advance");
        self.host.schedule(
            delay,
            Timer::Advance {
                slide: slide.id,
                token: slide.token,
            },
        );
    }

    fn advance(&mut self) {
        if let PlaybackState::Displaying(previous) = mem::replace(&mut self.state, PlaybackState::Idle) {
            self.outgoing.push(previous.handle);
            self.host.schedule(self.timing.transition, Timer::Dispose(previous.handle));
        }

        loop {
            let Some(index) = self.queue.advance() else {
                self.enter_retrying(self.timing.empty_retry);
                return;
            };

            if self.timing.is_checkpoint(index) {
                self.fetcher.refresh(&mut self.host, self.epoch);
            }

            let Some(item) = self.queue.current().cloned() else {
                continue;
            };

            let slide = self.next_slide;
            self.next_slide += 1;

            match self.host.render_item(slide, &item) {
                Ok(handle) => {
                    let delay = self.timing.advance_delay(&item);
                    debug!(slide, id = %item.id, index, delay_ms = delay.as_millis() as u64, "Displaying slide");

                    self.host.mark_viewed(item.id);
                    self.host.schedule(delay, Timer::Advance { slide, token: 0 });
                    self.state = PlaybackState::Displaying(Slide {
                        id: slide,
                        item,
                        handle,
                        token: 0,
                    });
                    return;
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Render failed, evicting");
                    self.queue.remove_current();
                }
            }
        }
    }

    fn is_current(&self, slide: SlideId) -> bool {
        matches!(&self.state, PlaybackState::Displaying(current) if current.id == slide)
    }

    fn current_token(&self) -> Option<u32> {
        match &self.state {
            PlaybackState::Displaying(slide) => Some(slide.token),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use anyhow::anyhow;

    use super::*;
    use crate::model::queue::tests::{photo, video};

    #[derive(Default)]
    struct FakeHost {
        rendered: Vec<(SlideId, MediaId)>,
        disposed: Vec<RenderHandle>,
        feeds: Vec<FeedRequest>,
        timers: Vec<(Duration, Timer)>,
        viewed: Vec<MediaId>,
        waiting: usize,
        broken: HashSet<MediaId>,
        next_handle: u64,
    }

    impl RenderPort for FakeHost {
        fn render_item(&mut self, slide: SlideId, item: &MediaItem) -> Result<RenderHandle> {
            if self.broken.contains(&item.id) {
                return Err(anyhow!("cannot render {}", item.id));
            }
            self.rendered.push((slide, item.id));
            self.next_handle += 1;
            Ok(RenderHandle(self.next_handle))
        }

        fn dispose(&mut self, handle: RenderHandle) {
            self.disposed.push(handle);
        }

        fn show_waiting(&mut self) {
            self.waiting += 1;
        }
    }

    impl FeedPort for FakeHost {
        fn request_feed(&mut self, request: FeedRequest) {
            self.feeds.push(request);
        }
    }

    impl SlideshowHost for FakeHost {
        fn schedule(&mut self, delay: Duration, timer: Timer) {
            self.timers.push((delay, timer));
        }

        fn mark_viewed(&mut self, id: MediaId) {
            self.viewed.push(id);
        }
    }

    fn scheduler() -> Scheduler<FakeHost> {
        let mut scheduler = Scheduler::new(FakeHost::default(), SlideTiming::default(), FeedOrder::Newest);
        scheduler.start();
        scheduler
    }

    fn page(items: Vec<MediaItem>) -> FeedPage {
        FeedPage {
            items,
            next_cursor: None,
        }
    }

    fn last_feed(scheduler: &Scheduler<FakeHost>) -> FeedRequest {
        scheduler.host().feeds.last().cloned().expect("no feed request")
    }

    fn load(scheduler: &mut Scheduler<FakeHost>, items: Vec<MediaItem>) {
        let request = last_feed(scheduler);
        assert_eq!(request.purpose, FeedPurpose::Initial);
        scheduler.handle(SlideEvent::FeedLoaded {
            request,
            result: Ok(page(items)),
        });
    }

    fn current(scheduler: &Scheduler<FakeHost>) -> &Slide {
        match scheduler.state() {
            PlaybackState::Displaying(slide) => slide,
            other => panic!("expected a slide on screen, got {other:?}"),
        }
    }

    fn rendered_ids(scheduler: &Scheduler<FakeHost>) -> Vec<i64> {
        scheduler.host().rendered.iter().map(|(_, id)| id.0).collect()
    }

    fn advance_timers(scheduler: &Scheduler<FakeHost>) -> Vec<(Duration, Timer)> {
        scheduler
            .host()
            .timers
            .iter()
            .filter(|(_, timer)| matches!(timer, Timer::Advance { .. }))
            .cloned()
            .collect()
    }

    fn fire_advance(scheduler: &mut Scheduler<FakeHost>) {
        let (_, timer) = *advance_timers(scheduler).last().expect("no advance timer");
        scheduler.handle(SlideEvent::Timer(timer));
    }

    #[test]
    fn start_requests_initial_feed_once() {
        let mut scheduler = scheduler();
        scheduler.start();

        assert_eq!(scheduler.host().feeds.len(), 1);
        let request = last_feed(&scheduler);
        assert_eq!(request.query.limit, 50);
        assert_eq!(request.query.order, FeedOrder::Newest);
        assert_eq!(scheduler.state(), &PlaybackState::Idle);
    }

    #[test]
    fn initial_load_displays_first_item() {
        let mut scheduler = scheduler();

        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);

        assert_eq!(current(&scheduler).item.id, MediaId(1));
        assert_eq!(rendered_ids(&scheduler), vec![1]);
        assert_eq!(scheduler.host().viewed, vec![MediaId(1)]);

        let timers = advance_timers(&scheduler);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].0, Duration::from_secs(5));
    }

    #[test]
    fn empty_initial_feed_retries_without_rendering() {
        let mut scheduler = scheduler();

        load(&mut scheduler, vec![]);

        assert_eq!(scheduler.state(), &PlaybackState::Retrying);
        assert!(scheduler.host().rendered.is_empty());
        assert_eq!(scheduler.host().waiting, 1);

        let (delay, timer) = *scheduler.host().timers.last().unwrap();
        assert_eq!(delay, Duration::from_secs(5));
        assert!(matches!(timer, Timer::Retry { .. }));

        scheduler.handle(SlideEvent::Timer(timer));

        assert_eq!(scheduler.host().feeds.len(), 2);
        assert_eq!(last_feed(&scheduler).purpose, FeedPurpose::Initial);
        assert_eq!(scheduler.state(), &PlaybackState::Idle);
    }

    #[test]
    fn failed_initial_feed_retries() {
        let mut scheduler = scheduler();
        let request = last_feed(&scheduler);

        scheduler.handle(SlideEvent::FeedLoaded {
            request,
            result: Err("502 Bad Gateway".to_string()),
        });

        assert_eq!(scheduler.state(), &PlaybackState::Retrying);
        assert!(matches!(scheduler.host().timers.last(), Some((_, Timer::Retry { .. }))));
    }

    #[test]
    fn advance_wraps_to_first_item() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2)]);

        fire_advance(&mut scheduler);
        fire_advance(&mut scheduler);

        assert_eq!(rendered_ids(&scheduler), vec![1, 2, 1]);
        assert_eq!(scheduler.queue().cursor(), Some(0));
    }

    #[test]
    fn previous_slide_is_disposed_after_transition() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2)]);
        let first = current(&scheduler).handle;

        fire_advance(&mut scheduler);

        let dispose = scheduler
            .host()
            .timers
            .iter()
            .find(|(_, timer)| *timer == Timer::Dispose(first))
            .cloned();
        let (delay, timer) = dispose.expect("no dispose timer");
        assert_eq!(delay, Duration::from_millis(1500));
        assert!(scheduler.host().disposed.is_empty());

        scheduler.handle(SlideEvent::Timer(timer));
        scheduler.handle(SlideEvent::Timer(timer));

        assert_eq!(scheduler.host().disposed, vec![first]);
    }

    #[test]
    fn stale_advance_timer_is_ignored() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);
        let (_, stale) = advance_timers(&scheduler)[0];

        scheduler.skip();
        scheduler.handle(SlideEvent::Timer(stale));

        assert_eq!(rendered_ids(&scheduler), vec![1, 2]);
    }

    #[test]
    fn video_with_known_duration_advances_at_that_duration() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![video(1, Some(8.0)), photo(2)]);

        let timers = advance_timers(&scheduler);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].0, Duration::from_millis(8000));
    }

    #[test]
    fn video_end_advances_before_timer_and_timer_is_then_stale() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![video(1, Some(8.0)), photo(2), photo(3)]);
        let slide = current(&scheduler).id;
        let (_, video_timer) = advance_timers(&scheduler)[0];

        scheduler.handle(SlideEvent::Media(MediaEvent::Ended { slide }));
        scheduler.handle(SlideEvent::Timer(video_timer));
        scheduler.handle(SlideEvent::Media(MediaEvent::Ended { slide }));

        assert_eq!(rendered_ids(&scheduler), vec![1, 2]);
    }

    #[test]
    fn measured_video_duration_replaces_safety_timer() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![video(1, None), photo(2), photo(3)]);
        let slide = current(&scheduler).id;

        let timers = advance_timers(&scheduler);
        assert_eq!(timers[0].0, Duration::from_secs(60));
        let (_, safety) = timers[0];

        scheduler.handle(SlideEvent::Media(MediaEvent::Loaded {
            slide,
            duration: Some(12.5),
        }));

        let timers = advance_timers(&scheduler);
        assert_eq!(timers.len(), 2);
        assert_eq!(timers[1].0, Duration::from_millis(12_500));
        assert_eq!(scheduler.queue().current().and_then(|item| item.duration), Some(12.5));

        scheduler.handle(SlideEvent::Timer(safety));
        assert_eq!(rendered_ids(&scheduler), vec![1]);

        fire_advance(&mut scheduler);
        assert_eq!(rendered_ids(&scheduler), vec![1, 2]);
    }

    #[test]
    fn failure_evicts_item_and_shows_the_next_one() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);
        fire_advance(&mut scheduler);
        let slide = current(&scheduler).id;
        assert_eq!(current(&scheduler).item.id, MediaId(2));

        scheduler.handle(SlideEvent::Media(MediaEvent::Failed {
            slide,
            reason: "decode error".to_string(),
        }));

        let ids: Vec<i64> = scheduler.queue().items().iter().map(|item| item.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(current(&scheduler).item.id, MediaId(3));
        assert_eq!(rendered_ids(&scheduler), vec![1, 2, 3]);
    }

    #[test]
    fn stale_failure_for_previous_slide_is_ignored() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2)]);
        let first = current(&scheduler).id;
        fire_advance(&mut scheduler);

        scheduler.handle(SlideEvent::Media(MediaEvent::Failed {
            slide: first,
            reason: "late".to_string(),
        }));

        assert_eq!(scheduler.queue().len(), 2);
        assert_eq!(current(&scheduler).item.id, MediaId(2));
    }

    #[test]
    fn evicting_every_item_falls_back_to_retrying() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1)]);
        let slide = current(&scheduler).id;

        scheduler.handle(SlideEvent::Media(MediaEvent::Failed {
            slide,
            reason: "404".to_string(),
        }));

        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.state(), &PlaybackState::Retrying);
        let (delay, timer) = *scheduler.host().timers.last().unwrap();
        assert_eq!(delay, Duration::from_secs(2));
        assert!(matches!(timer, Timer::Retry { .. }));
    }

    #[test]
    fn render_errors_are_evicted_in_place() {
        let mut host = FakeHost::default();
        host.broken.insert(MediaId(2));
        let mut scheduler = Scheduler::new(host, SlideTiming::default(), FeedOrder::Newest);
        scheduler.start();
        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);

        fire_advance(&mut scheduler);

        assert_eq!(current(&scheduler).item.id, MediaId(3));
        assert!(!scheduler.queue().contains(MediaId(2)));
    }

    #[test]
    fn checkpoints_trigger_single_refresh() {
        let mut scheduler = scheduler();
        load(&mut scheduler, (1..=7).map(photo).collect());

        let refreshes = |s: &Scheduler<FakeHost>| {
            s.host()
                .feeds
                .iter()
                .filter(|request| request.purpose == FeedPurpose::Refresh)
                .count()
        };

        // Index 0 is a checkpoint; the refresh is still pending at index 5.
        assert_eq!(refreshes(&scheduler), 1);
        for _ in 0..5 {
            fire_advance(&mut scheduler);
        }
        assert_eq!(scheduler.queue().cursor(), Some(5));
        assert_eq!(refreshes(&scheduler), 1);
    }

    #[test]
    fn refresh_merges_new_items_after_current() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);
        let refresh = last_feed(&scheduler);
        assert_eq!(refresh.purpose, FeedPurpose::Refresh);

        scheduler.handle(SlideEvent::FeedLoaded {
            request: refresh,
            result: Ok(page(vec![photo(9), photo(1)])),
        });
        fire_advance(&mut scheduler);

        let ids: Vec<i64> = scheduler.queue().items().iter().map(|item| item.id.0).collect();
        assert_eq!(ids, vec![1, 9, 2, 3]);
        assert_eq!(current(&scheduler).item.id, MediaId(9));
    }

    #[test]
    fn reset_disposes_everything_and_ignores_old_responses() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2), photo(3)]);
        let refresh = last_feed(&scheduler);
        fire_advance(&mut scheduler);
        let (_, stale_timer) = *advance_timers(&scheduler).last().unwrap();

        scheduler.reset(FeedOrder::Random);

        assert_eq!(scheduler.host().disposed.len(), 2);
        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.order(), FeedOrder::Random);

        let reload = last_feed(&scheduler);
        assert_eq!(reload.purpose, FeedPurpose::Initial);
        assert_eq!(reload.query.order, FeedOrder::Random);

        scheduler.handle(SlideEvent::FeedLoaded {
            request: refresh,
            result: Ok(page(vec![photo(7)])),
        });
        scheduler.handle(SlideEvent::Timer(stale_timer));

        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.state(), &PlaybackState::Idle);

        load(&mut scheduler, vec![photo(4)]);
        assert_eq!(current(&scheduler).item.id, MediaId(4));
    }

    #[test]
    fn dispose_stops_reacting_to_events() {
        let mut scheduler = scheduler();
        load(&mut scheduler, vec![photo(1), photo(2)]);
        let (_, timer) = advance_timers(&scheduler)[0];

        scheduler.dispose();
        scheduler.handle(SlideEvent::Timer(timer));

        assert_eq!(rendered_ids(&scheduler), vec![1]);
        assert_eq!(scheduler.host().disposed.len(), 1);
        assert_eq!(scheduler.state(), &PlaybackState::Idle);
    }
}
