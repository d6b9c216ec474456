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

//! Slide display durations and scheduler delays.

use std::time::Duration;

use crate::{
    config::SlideshowConfig,
    model::{MediaItem, MediaKind},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SlideTiming {
    pub(crate) photo: Duration,
    pub(crate) video_max: Duration,
    pub(crate) transition: Duration,
    pub(crate) load_retry: Duration,
    pub(crate) empty_retry: Duration,
    pub(crate) initial_limit: usize,
    pub(crate) refresh_limit: usize,
    pub(crate) refresh_stride: usize,
}

impl Default for SlideTiming {
    fn default() -> Self {
        Self {
            photo: Duration::from_secs(5),
            video_max: Duration::from_secs(60),
            transition: Duration::from_millis(1500),
            load_retry: Duration::from_secs(5),
            empty_retry: Duration::from_secs(2),
            initial_limit: 50,
            refresh_limit: 20,
            refresh_stride: 5,
        }
    }
}

impl From<&SlideshowConfig> for SlideTiming {
    fn from(config: &SlideshowConfig) -> Self {
        Self {
            photo: Duration::from_secs(config.photo_secs.max(1)),
            video_max: Duration::from_secs(config.video_max_secs.max(1)),
            transition: Duration::from_millis(config.transition_ms),
            load_retry: Duration::from_secs(config.load_retry_secs.max(1)),
            empty_retry: Duration::from_secs(config.empty_retry_secs.max(1)),
            initial_limit: config.initial_limit.max(1),
            refresh_limit: config.refresh_limit.max(1),
            refresh_stride: config.refresh_stride.max(1),
        }
    }
}

impl SlideTiming {
    /// How long an item stays on screen before the advance timer fires.
    ///
    /// Videos use their known duration capped at `video_max`; without one
    /// the cap itself acts as a safety net behind the end-of-playback event.
    pub(crate) fn advance_delay(&self, item: &MediaItem) -> Duration {
        match item.kind {
            MediaKind::Photo => self.photo,
            MediaKind::Video => self.video_delay(item.duration),
        }
    }

    pub(crate) fn video_delay(&self, seconds: Option<f64>) -> Duration {
        seconds
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .map_or(self.video_max, |duration| duration.min(self.video_max))
    }

    /// Whether landing on `index` should trigger a background refresh: on
    /// wrap-around to the start and at every `refresh_stride` items.
    pub(crate) fn is_checkpoint(&self, index: usize) -> bool {
        index == 0 || index % self.refresh_stride == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::queue::tests::{photo, video};

    #[test]
    fn photos_use_fixed_duration() {
        let timing = SlideTiming::default();

        assert_eq!(timing.advance_delay(&photo(1)), Duration::from_secs(5));
    }

    #[test]
    fn video_uses_reported_duration() {
        let timing = SlideTiming::default();

        assert_eq!(timing.advance_delay(&video(1, Some(8.0))), Duration::from_millis(8000));
    }

    #[test]
    fn video_duration_is_capped() {
        let timing = SlideTiming::default();

        assert_eq!(timing.advance_delay(&video(1, Some(600.0))), Duration::from_secs(60));
    }

    #[test]
    fn unknown_or_bogus_video_duration_falls_back_to_cap() {
        let timing = SlideTiming::default();

        assert_eq!(timing.advance_delay(&video(1, None)), Duration::from_secs(60));
        assert_eq!(timing.video_delay(Some(f64::NAN)), Duration::from_secs(60));
        assert_eq!(timing.video_delay(Some(-3.0)), Duration::from_secs(60));
    }

    #[test]
    fn checkpoints_at_wrap_and_stride() {
        let timing = SlideTiming::default();

        let checkpoints: Vec<usize> = (0..12).filter(|index| timing.is_checkpoint(*index)).collect();
        assert_eq!(checkpoints, vec![0, 5, 10]);
    }

    #[test]
    fn config_values_are_clamped() {
        let config = SlideshowConfig {
            photo_secs: 0,
            refresh_stride: 0,
            ..SlideshowConfig::default()
        };

        let timing = SlideTiming::from(&config);
        assert_eq!(timing.photo, Duration::from_secs(1));
        assert_eq!(timing.refresh_stride, 1);
    }
}
