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

//! Domain models and core data structures.
//!
//! This module defines the entities exchanged with the event backend (media
//! items, feed pages, configuration and statistics) together with the small
//! value types the rest of the application passes around.

pub(crate) mod queue;

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier of a media record, stable across refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct MediaId(pub(crate) i64);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MediaKind {
    #[serde(alias = "image")]
    Photo,
    Video,
}

/// A single entry of the slideshow feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct MediaItem {
    pub(crate) id: MediaId,
    #[serde(rename = "type")]
    pub(crate) kind: MediaKind,
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) thumbnail: Option<String>,
    #[serde(default)]
    pub(crate) caption: Option<String>,
    #[serde(default)]
    pub(crate) author: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) created_at: DateTime<Utc>,
    /// Display duration in seconds, measured by the client for videos.
    #[serde(default)]
    pub(crate) duration: Option<f64>,
    #[serde(default)]
    pub(crate) is_starred: bool,
    #[serde(default)]
    pub(crate) file_size: Option<u64>,
}

impl MediaItem {
    pub(crate) fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// The path to hand to the display: photos prefer the lighter thumbnail,
    /// videos always play the original.
    pub(crate) fn display_path(&self) -> &str {
        match (self.kind, self.thumbnail.as_deref()) {
            (MediaKind::Photo, Some(thumbnail)) => thumbnail,
            _ => &self.url,
        }
    }
}

/// One page of `GET /slideshow/feed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FeedPage {
    #[serde(default)]
    pub(crate) items: Vec<MediaItem>,
    #[serde(default)]
    pub(crate) next_cursor: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FeedOrder {
    #[default]
    Newest,
    Random,
}

impl FeedOrder {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FeedOrder::Newest => "newest",
            FeedOrder::Random => "random",
        }
    }

    pub(crate) fn toggled(self) -> Self {
        match self {
            FeedOrder::Newest => FeedOrder::Random,
            FeedOrder::Random => FeedOrder::Newest,
        }
    }
}

/// Parameters of a feed request. `cursor` pages backwards in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedQuery {
    pub(crate) limit: usize,
    pub(crate) cursor: Option<String>,
    pub(crate) order: FeedOrder,
}

impl FeedQuery {
    pub(crate) fn newest(limit: usize) -> Self {
        Self {
            limit,
            cursor: None,
            order: FeedOrder::Newest,
        }
    }
}

/// Dynamic frontend configuration served by `GET /config`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct FrontendConfig {
    #[serde(default)]
    pub(crate) banner_message_en: Option<String>,
    #[serde(default)]
    pub(crate) banner_message_es: Option<String>,
    #[serde(default)]
    pub(crate) banner_message: Option<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub(crate) max_file_size_mb: u64,
    #[serde(default = "default_max_video_duration_sec")]
    pub(crate) max_video_duration_sec: u64,
    #[serde(default)]
    pub(crate) post_upload_url: Option<String>,
    #[serde(default)]
    pub(crate) post_upload_label: Option<String>,
    #[serde(default)]
    pub(crate) mode: Option<String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            banner_message_en: None,
            banner_message_es: None,
            banner_message: None,
            max_file_size_mb: default_max_file_size_mb(),
            max_video_duration_sec: default_max_video_duration_sec(),
            post_upload_url: None,
            post_upload_label: None,
            mode: None,
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    500
}

fn default_max_video_duration_sec() -> u64 {
    60
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct PublicStats {
    #[serde(default)]
    pub(crate) photos: u64,
    #[serde(default)]
    pub(crate) videos: u64,
    #[serde(default)]
    pub(crate) total_media: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct AdminStats {
    #[serde(default)]
    pub(crate) media_total: u64,
    #[serde(default)]
    pub(crate) media_photos: u64,
    #[serde(default)]
    pub(crate) media_videos: u64,
    #[serde(default)]
    pub(crate) disk_used_gb: Option<f64>,
    #[serde(default)]
    pub(crate) disk_total_gb: Option<f64>,
    #[serde(default)]
    pub(crate) disk_free_gb: Option<f64>,
    #[serde(default)]
    pub(crate) cpu_percent: Option<f64>,
    #[serde(default)]
    pub(crate) ram_percent: Option<f64>,
    #[serde(default)]
    pub(crate) last_backup: Option<String>,
}

/// An entry of `GET /my-uploads`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct MyUpload {
    pub(crate) id: MediaId,
    #[serde(rename = "type")]
    pub(crate) kind: MediaKind,
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) thumbnail: Option<String>,
    #[serde(default)]
    pub(crate) caption: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) file_size: Option<u64>,
}

/// Admin moderation verbs accepted by `POST /admin/media/{id}/action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModerationAction {
    Hide,
    Unhide,
    Star,
    Unstar,
    Delete,
}

impl ModerationAction {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ModerationAction::Hide => "hide",
            ModerationAction::Unhide => "unhide",
            ModerationAction::Star => "star",
            ModerationAction::Unstar => "unstar",
            ModerationAction::Delete => "delete",
        }
    }
}

/// Accepts both offset-carrying RFC 3339 timestamps and the naive ISO form
/// the backend emits for SQLite rows, which are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map(|naive| naive.and_utc()),
    }
}
