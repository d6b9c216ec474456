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

//! Log file setup.
//!
//! The terminal belongs to the UI, so log output goes to a file, by default
//! `guestreel.log` next to the configuration file. `RUST_LOG` takes
//! precedence over the configured level.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{self, AppConfig};

const LOG_FILE_NAME: &str = "guestreel.log";

pub(crate) fn init_logging(app_config: &AppConfig) -> Result<PathBuf> {
    let path = log_path(app_config.log_file.as_deref(), config::config_dir());
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app_config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;

    Ok(path)
}

fn log_path(configured: Option<&Path>, config_dir: Option<PathBuf>) -> PathBuf {
    match configured {
        Some(path) => path.to_path_buf(),
        None => config_dir.unwrap_or_default().join(LOG_FILE_NAME),
    }
}
