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

//! Application configuration.
//!
//! This module manages the application configuration file and the small
//! preferences file the UI writes back whenever the language or theme is
//! toggled. Both are plain confy stores; an unreadable file falls back to
//! defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{i18n::Language, model::FeedOrder, theme::ThemeMode};

pub(crate) const CONFIG_NAME: &str = "guestreel";

const PREFERENCES_NAME: &str = "preferences";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) server_url: String,
    pub(crate) admin_token: Option<String>,
    pub(crate) request_timeout_secs: u64,
    pub(crate) log_level: String,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) player: PlayerConfig,
    pub(crate) slideshow: SlideshowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: "http://localhost:8000".to_string(),
            admin_token: None,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            log_file: None,
            player: PlayerConfig::default(),
            slideshow: SlideshowConfig::default(),
        }
    }
}

/// Settings for the mpv window the slides are displayed in.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct PlayerConfig {
    pub(crate) fullscreen: bool,
    pub(crate) video_output: Option<String>,
    pub(crate) mute: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            video_output: None,
            mute: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct SlideshowConfig {
    pub(crate) order: FeedOrder,
    pub(crate) photo_secs: u64,
    pub(crate) video_max_secs: u64,
    pub(crate) transition_ms: u64,
    pub(crate) load_retry_secs: u64,
    pub(crate) empty_retry_secs: u64,
    pub(crate) initial_limit: usize,
    pub(crate) refresh_limit: usize,
    pub(crate) refresh_stride: usize,
    pub(crate) config_poll_secs: u64,
    pub(crate) stats_poll_secs: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            order: FeedOrder::Newest,
            photo_secs: 5,
            video_max_secs: 60,
            transition_ms: 1500,
            load_retry_secs: 5,
            empty_retry_secs: 2,
            initial_limit: 50,
            refresh_limit: 20,
            refresh_stride: 5,
            config_poll_secs: 30,
            stats_poll_secs: 60,
        }
    }
}

/// UI choices remembered between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Preferences {
    pub(crate) language: Option<Language>,
    pub(crate) theme: ThemeMode,
}

pub(crate) fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub(crate) fn load_preferences() -> Preferences {
    confy::load(CONFIG_NAME, PREFERENCES_NAME).unwrap_or_default()
}

pub(crate) fn save_preferences(preferences: &Preferences) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, PREFERENCES_NAME, preferences)
}

/// Directory holding the confy files, used for the default log location.
pub(crate) fn config_dir() -> Option<PathBuf> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
}
