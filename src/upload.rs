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

//! Media uploads.
//!
//! An upload is validated locally against the limits advertised by the
//! backend before anything is sent, then streamed on its own thread with
//! progress reporting and a bounded number of retries. Results come back to
//! the event loop as [`UploadEvent`]s.

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::mpsc::Sender,
    thread,
    time::Duration,
};

use lofty::{prelude::*, probe::Probe};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiClient, ApiError, UploadBody},
    events::AppEvent,
    model::{FrontendConfig, MediaKind},
};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("File too large ({size} bytes, limit {limit_mb} MB)")]
    FileTooLarge { size: u64, limit_mb: u64 },

    #[error("Video too long ({seconds}s, limit {limit_secs}s)")]
    VideoTooLong { seconds: u64, limit_secs: u64 },

    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub(crate) enum UploadEvent {
    Progress(u8),
    Retrying { attempt: u32, attempts: u32 },
    Finished,
    Failed(UploadError),
}

/// A validated file, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UploadJob {
    pub(crate) path: PathBuf,
    pub(crate) file_name: String,
    pub(crate) caption: Option<String>,
    pub(crate) kind: MediaKind,
    pub(crate) mime_type: &'static str,
    pub(crate) size: u64,
}

impl UploadJob {
    /// Checks the file against the backend limits. Videos whose length cannot
    /// be probed are let through; the backend has the final say.
    pub(crate) fn prepare(path: &Path, caption: Option<String>, limits: &FrontendConfig) -> Result<Self, UploadError> {
        let metadata = match path.metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(UploadError::NotFound(path.to_path_buf())),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let (kind, mime_type) = media_type(&extension).ok_or_else(|| UploadError::Unsupported(extension.clone()))?;

        let size = metadata.len();
        if size > limits.max_file_size_mb * BYTES_PER_MB {
            return Err(UploadError::FileTooLarge {
                size,
                limit_mb: limits.max_file_size_mb,
            });
        }

        if kind == MediaKind::Video
            && let Some(duration) = probe_duration(path)
            && duration.as_secs_f64() > limits.max_video_duration_sec as f64
        {
            return Err(UploadError::VideoTooLong {
                seconds: duration.as_secs_f64().ceil() as u64,
                limit_secs: limits.max_video_duration_sec,
            });
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("upload.{extension}"));

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            caption: caption.map(|caption| caption.trim().to_string()).filter(|caption| !caption.is_empty()),
            kind,
            mime_type,
            size,
        })
    }
}

pub(crate) fn media_type(extension: &str) -> Option<(MediaKind, &'static str)> {
    let media = match extension {
        "jpg" | "jpeg" => (MediaKind::Photo, "image/jpeg"),
        "png" => (MediaKind::Photo, "image/png"),
        "gif" => (MediaKind::Photo, "image/gif"),
        "webp" => (MediaKind::Photo, "image/webp"),
        "heic" => (MediaKind::Photo, "image/heic"),
        "heif" => (MediaKind::Photo, "image/heif"),
        "mp4" | "m4v" => (MediaKind::Video, "video/mp4"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "webm" => (MediaKind::Video, "video/webm"),
        "mkv" => (MediaKind::Video, "video/x-matroska"),
        _ => return None,
    };

    Some(media)
}

fn probe_duration(path: &Path) -> Option<Duration> {
    match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(tagged) => Some(tagged.properties().duration()).filter(|duration| !duration.is_zero()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not probe video duration");
            None
        }
    }
}

/// Reader adapter reporting whole-percent progress as the body streams.
pub(crate) struct ProgressReader<R, F> {
    inner: R,
    sent: u64,
    total: u64,
    last: Option<u8>,
    on_progress: F,
}

impl<R, F> ProgressReader<R, F>
where
    F: FnMut(u8),
{
    pub(crate) fn new(inner: R, total: u64, on_progress: F) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            last: None,
            on_progress,
        }
    }
}

impl<R: Read, F: FnMut(u8)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.inner.read(buf)?;
        self.sent += count as u64;

        let percent = if self.total == 0 {
            100
        } else {
            (self.sent.saturating_mul(100) / self.total).min(100) as u8
        };
        if self.last != Some(percent) {
            self.last = Some(percent);
            (self.on_progress)(percent);
        }

        Ok(count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RetryPolicy {
    pub(crate) attempts: u32,
    pub(crate) base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based): the base delay times
    /// the attempt number.
    pub(crate) fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    /// `wait` is called with each backoff delay before the next attempt.
    pub(crate) fn run<T, E, Op, Wait>(&self, mut operation: Op, mut wait: Wait) -> Result<T, E>
    where
        E: std::fmt::Display,
        Op: FnMut(u32) -> Result<T, E>,
        Wait: FnMut(u32, Duration),
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.attempts => return Err(e),
                Err(e) => {
                    warn!(attempt, attempts = self.attempts, error = %e, "Upload attempt failed");
                    wait(attempt, self.delay_after(attempt));
                    attempt += 1;
                }
            }
        }
    }
}

/// Validates and uploads a file on a dedicated thread so a slow upload never
/// holds up feed requests on the task worker.
pub(crate) fn spawn_upload(
    client: ApiClient,
    path: PathBuf,
    caption: Option<String>,
    limits: FrontendConfig,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let outcome = UploadJob::prepare(&path, caption, &limits)
            .and_then(|job| send_with_retry(&client, &job, RetryPolicy::default(), &event_tx));

        let event = match outcome {
            Ok(()) => UploadEvent::Finished,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Upload failed");
                UploadEvent::Failed(e)
            }
        };
        let _ = event_tx.send(AppEvent::Upload(event));
    });
}

fn send_with_retry(
    client: &ApiClient,
    job: &UploadJob,
    policy: RetryPolicy,
    event_tx: &Sender<AppEvent>,
) -> Result<(), UploadError> {
    info!(file = %job.file_name, size = job.size, mime = job.mime_type, "Uploading");

    policy.run(
        |_| {
            let progress_tx = event_tx.clone();
            let reader = ProgressReader::new(File::open(&job.path)?, job.size, move |percent| {
                let _ = progress_tx.send(AppEvent::Upload(UploadEvent::Progress(percent)));
            });

            let body = UploadBody {
                reader,
                length: job.size,
                file_name: job.file_name.clone(),
                mime_type: job.mime_type,
            };
            client.upload(body, job.caption.as_deref()).map_err(UploadError::from)
        },
        |attempt, delay| {
            let _ = event_tx.send(AppEvent::Upload(UploadEvent::Retrying {
                attempt,
                attempts: policy.attempts,
            }));
            thread::sleep(delay);
        },
    )
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Write};

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn limits(max_mb: u64) -> FrontendConfig {
        FrontendConfig {
            max_file_size_mb: max_mb,
            ..FrontendConfig::default()
        }
    }

    fn file_with(suffix: &str, bytes: usize) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
        file
    }

    #[test]
    fn photo_within_limits_is_prepared() {
        let file = file_with(".JPG", 1024);

        let job = UploadJob::prepare(file.path(), Some("  Cheers! ".to_string()), &limits(1)).unwrap();

        assert_eq!(job.kind, MediaKind::Photo);
        assert_eq!(job.mime_type, "image/jpeg");
        assert_eq!(job.size, 1024);
        assert_eq!(job.caption.as_deref(), Some("Cheers!"));
        assert!(job.file_name.ends_with(".JPG"));
    }

    #[test]
    fn oversized_file_is_rejected_before_upload() {
        let file = file_with(".png", (BYTES_PER_MB + 1) as usize);

        let error = UploadJob::prepare(file.path(), None, &limits(1)).unwrap_err();

        assert!(matches!(error, UploadError::FileTooLarge { limit_mb: 1, .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = file_with(".exe", 10);

        assert!(matches!(
            UploadJob::prepare(file.path(), None, &limits(1)),
            Err(UploadError::Unsupported(ext)) if ext == "exe"
        ));
    }

    #[test]
    fn missing_file_and_directory_are_rejected() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            UploadJob::prepare(&dir.path().join("nope.jpg"), None, &limits(1)),
            Err(UploadError::NotFound(_))
        ));
        assert!(matches!(
            UploadJob::prepare(dir.path(), None, &limits(1)),
            Err(UploadError::NotAFile(_))
        ));
    }

    #[test]
    fn unprobeable_video_skips_duration_check() {
        let file = file_with(".mp4", 64);

        let job = UploadJob::prepare(file.path(), None, &limits(1)).unwrap();

        assert_eq!(job.kind, MediaKind::Video);
        assert_eq!(job.mime_type, "video/mp4");
        assert_eq!(job.caption, None);
    }

    #[test]
    fn progress_is_reported_in_whole_percent_steps() {
        let reported = RefCell::new(Vec::new());
        let mut reader = ProgressReader::new(&[0u8; 10][..], 10, |percent| reported.borrow_mut().push(percent));

        let mut buf = [0u8; 3];
        while reader.read(&mut buf).unwrap() > 0 {}

        assert_eq!(*reported.borrow(), vec![30, 60, 90, 100]);
    }

    #[test]
    fn retry_waits_two_then_four_seconds_and_gives_up_after_three() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let mut waits = Vec::new();

        let result: Result<(), String> = policy.run(
            |_| {
                calls += 1;
                Err("connection reset".to_string())
            },
            |attempt, delay| waits.push((attempt, delay)),
        );

        assert!(result.is_err());
        assert_eq!(calls, 3);
        assert_eq!(waits, vec![(1, Duration::from_secs(2)), (2, Duration::from_secs(4))]);
    }

    #[test]
    fn retry_stops_on_first_success() {
        let policy = RetryPolicy::default();
        let mut waits = 0;

        let result: Result<u32, String> = policy.run(
            |attempt| if attempt < 2 { Err("timeout".to_string()) } else { Ok(attempt) },
            |_, _| waits += 1,
        );

        assert_eq!(result, Ok(2));
        assert_eq!(waits, 1);
    }
}
