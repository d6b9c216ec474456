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

use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    App, SidePanel, UploadStatus,
    commander::{Command, CommandError},
    config,
    events::AppEvent,
    guest::{self, GuestIdentity, GuestName},
    i18n::{Language, Text},
    model::{AdminStats, FeedOrder, FrontendConfig, MediaId, ModerationAction, MyUpload, PublicStats},
    slideshow::SlideEvent,
    tasks::AppTask,
    theme::Theme,
    upload::{UploadError, UploadEvent},
    util,
};

pub(super) fn handle_slideshow_event(app: &mut App, event: SlideEvent) {
    app.scheduler.handle(event);
}

pub(super) fn handle_config_loaded(app: &mut App, config: FrontendConfig) {
    app.frontend_config = config;
}

pub(super) fn handle_stats_loaded(app: &mut App, stats: PublicStats) {
    app.stats = Some(stats);
}

pub(super) fn handle_admin_stats_loaded(app: &mut App, stats: AdminStats) {
    app.admin_stats = Some(stats);
}

pub(super) fn handle_my_uploads_loaded(app: &mut App, uploads: Vec<MyUpload>) {
    app.my_uploads = uploads;
}

pub(super) fn handle_toggle_side_panel(app: &mut App) -> Result<()> {
    app.side_panel = app.side_panel.toggled();
    if app.side_panel == SidePanel::MyUploads && app.identity.is_some() {
        app.task_tx.send(AppTask::LoadMyUploads)?;
    }
    Ok(())
}

pub(super) fn handle_upload_event(app: &mut App, event: UploadEvent) -> Result<()> {
    match event {
        UploadEvent::Progress(percent) => app.upload = Some(UploadStatus::Sending(percent)),
        UploadEvent::Retrying { attempt, attempts } => app.upload = Some(UploadStatus::Retrying { attempt, attempts }),
        UploadEvent::Finished => {
            app.upload = None;
            let message = upload_success_message(app.language, &app.frontend_config);
            app.notify(message);
            app.task_tx.send(AppTask::LoadMyUploads)?;
        }
        UploadEvent::Failed(error) => {
            app.upload = None;
            let message = upload_failure_message(app.language, &error);
            app.notify_error(message);
        }
    }
    Ok(())
}

pub(super) fn handle_media_deleted(app: &mut App, id: MediaId) -> Result<()> {
    app.my_uploads.retain(|upload| upload.id != id);
    app.notify(format!("{} #{}", app.language.text(Text::Deleted), id.0));
    app.task_tx.send(AppTask::LoadMyUploads)?;
    Ok(())
}

pub(super) fn handle_moderated(app: &mut App, id: MediaId, action: ModerationAction) {
    app.notify(format!("{}: {} #{}", app.language.text(Text::ActionDone), action.as_str(), id.0));
}

/// After a purge nothing the show holds is valid any more.
pub(super) fn handle_purged(app: &mut App) {
    info!("Event media purged, reseeding slideshow");
    app.my_uploads.clear();
    let order = app.scheduler.order();
    app.scheduler.reset(order);
    app.notify(app.language.text(Text::ActionDone));
}

/// Failures reported by background tasks.
pub(super) fn handle_error(app: &mut App, message: String) {
    debug!(%message, "Showing error");
    app.notify_error(format!("{}: {}", app.language.text(Text::ActionFailed), message));
}

pub(super) fn handle_command_failed(app: &mut App, error: CommandError) {
    let message = command_error_message(app.language, &error);
    app.notify_error(message);
}

pub(super) fn handle_tick(app: &mut App) {
    let now = Instant::now();
    if app.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
        app.toast = None;
    }
}

pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    debug!(?command, "Running command");

    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,
        Command::Next => app.scheduler.skip(),
        Command::Order(order) => set_order(app, order),
        Command::Lang(language) => set_language(app, language),
        Command::Theme(mode) => {
            let mode = mode.unwrap_or_else(|| app.theme.mode.toggled());
            app.theme = Theme::for_mode(mode);
            app.preferences.theme = mode;
            if let Err(e) = util::term::apply_theme_bg(&app.theme) {
                warn!(error = %e, "Failed to set terminal background");
            }
            save_preferences(app);
        }
        Command::Name { first, last } => set_name(app, &first, &last)?,
        Command::Table(number) => set_table(app, number)?,
        Command::Logout => {
            update_identity(app, None)?;
            app.my_uploads.clear();
            app.notify(app.language.text(Text::LoggedOut));
        }
        Command::Upload { path, caption } => start_upload(app, path, caption)?,
        Command::Uploads => {
            app.side_panel = SidePanel::MyUploads;
            if app.identity.is_some() {
                app.task_tx.send(AppTask::LoadMyUploads)?;
            }
        }
        Command::Delete(id) => app.task_tx.send(AppTask::DeleteMedia(id))?,
        Command::Moderate(id, action) => app.task_tx.send(AppTask::Moderate(id, action))?,
        Command::Stats => app.task_tx.send(AppTask::LoadAdminStats)?,
        Command::Purge(pin) => app.task_tx.send(AppTask::Purge(pin))?,
    }

    Ok(())
}

/// A manual order change throws away the queue and pending work and starts
/// over from a fresh initial load.
fn set_order(app: &mut App, order: Option<FeedOrder>) {
    let order = order.unwrap_or_else(|| app.scheduler.order().toggled());
    app.scheduler.reset(order);

    let message = format!("{}: {}", app.language.text(Text::Order), app.language.order_label(order));
    app.notify(message);
}

fn set_language(app: &mut App, language: Option<Language>) {
    app.language = language.unwrap_or_else(|| app.language.toggled());
    app.preferences.language = Some(app.language);
    info!(language = app.language.code(), "Language changed");
    save_preferences(app);
}

fn save_preferences(app: &App) {
    if let Err(e) = config::save_preferences(&app.preferences) {
        warn!(error = %e, "Failed to save preferences");
    }
}

fn set_name(app: &mut App, first: &str, last: &str) -> Result<()> {
    let name = match GuestName::parse(first, last) {
        Ok(name) => name,
        Err(e) => {
            app.notify_error(e.to_string());
            return Ok(());
        }
    };

    let now = Utc::now();
    let identity = match &app.identity {
        Some(current) => current.renamed(&name, now),
        None => GuestIdentity::new(&name, now),
    };
    info!(name = %identity.name, "Guest name set");

    update_identity(app, Some(identity))?;
    app.notify(app.language.text(Text::NameSaved));
    Ok(())
}

fn set_table(app: &mut App, number: String) -> Result<()> {
    let Some(current) = &app.identity else {
        app.notify_error(app.language.text(Text::NameRequired));
        return Ok(());
    };

    let identity = GuestIdentity {
        table_number: number,
        ..current.clone()
    };
    update_identity(app, Some(identity))?;
    app.notify(app.language.text(Text::ActionDone));
    Ok(())
}

/// Stores the identity and hands it to the task worker, whose client sends
/// it with every request from then on.
fn update_identity(app: &mut App, identity: Option<GuestIdentity>) -> Result<()> {
    let stored = match &identity {
        Some(identity) => guest::save_identity(identity),
        None => guest::forget_identity(),
    };
    if let Err(e) = stored {
        warn!(error = %e, "Failed to store guest identity");
    }

    app.identity = identity.clone();
    let reload = identity.is_some();
    app.task_tx.send(AppTask::SetIdentity(identity))?;
    if reload {
        app.task_tx.send(AppTask::LoadMyUploads)?;
    }
    Ok(())
}

fn start_upload(app: &mut App, path: PathBuf, caption: Option<String>) -> Result<()> {
    if app.identity.is_none() {
        app.notify_error(app.language.text(Text::NameRequired));
        return Ok(());
    }

    app.upload = Some(UploadStatus::Sending(0));
    app.task_tx.send(AppTask::Upload {
        path,
        caption,
        limits: app.frontend_config.clone(),
    })?;
    Ok(())
}

/// The success toast, followed by the event's next-step link when one is
/// configured.
fn upload_success_message(language: Language, config: &FrontendConfig) -> String {
    let success = language.text(Text::UploadSuccess);

    let url = config.post_upload_url.as_deref().map(str::trim).filter(|url| !url.is_empty());
    match url {
        Some(url) => {
            let label = config
                .post_upload_label
                .as_deref()
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .unwrap_or(language.text(Text::NextStep));
            format!("{success} {label}: {url}")
        }
        None => success.to_string(),
    }
}

fn upload_failure_message(language: Language, error: &UploadError) -> String {
    match error {
        UploadError::FileTooLarge { limit_mb, .. } => {
            format!("{} (max {limit_mb} MB)", language.text(Text::FileTooLarge))
        }
        UploadError::VideoTooLong { limit_secs, .. } => {
            format!("{} (max {limit_secs}s)", language.text(Text::VideoTooLong))
        }
        UploadError::Unsupported(extension) => {
            format!("{}: .{extension}", language.text(Text::UnsupportedFile))
        }
        UploadError::Api(e) => format!("{}: {}", language.text(Text::UploadFailed), e.user_message()),
        other => format!("{}: {other}", language.text(Text::UploadFailed)),
    }
}

fn command_error_message(language: Language, error: &CommandError) -> String {
    match error {
        CommandError::Unconfirmed => language.text(Text::PurgeConfirm).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::api::ApiError;

    #[test]
    fn success_message_links_next_step() {
        let config = FrontendConfig {
            post_upload_url: Some("https://example.com/guestbook".to_string()),
            post_upload_label: Some("Sign the guestbook".to_string()),
            ..FrontendConfig::default()
        };

        assert_eq!(
            upload_success_message(Language::En, &config),
            "Upload Successful! Sign the guestbook: https://example.com/guestbook"
        );
    }

    #[test]
    fn success_message_defaults_label() {
        let config = FrontendConfig {
            post_upload_url: Some("https://example.com/next".to_string()),
            post_upload_label: Some("  ".to_string()),
            ..FrontendConfig::default()
        };

        assert_eq!(
            upload_success_message(Language::En, &config),
            "Upload Successful! next step: https://example.com/next"
        );
        assert_eq!(upload_success_message(Language::Es, &FrontendConfig::default()), "¡Subida Exitosa!");
    }

    #[test]
    fn failures_are_localized() {
        let too_large = UploadError::FileTooLarge { size: 10, limit_mb: 1 };
        assert_eq!(
            upload_failure_message(Language::En, &too_large),
            "File too large! (max 1 MB)"
        );

        let rejected = UploadError::Api(ApiError::from_body(StatusCode::FORBIDDEN, r#"{"detail": "Uploads closed"}"#));
        assert_eq!(upload_failure_message(Language::En, &rejected), "Upload failed: Uploads closed");

        let unsupported = UploadError::Unsupported("exe".to_string());
        assert_eq!(
            upload_failure_message(Language::Es, &unsupported),
            "Tipo de archivo no soportado: .exe"
        );
    }

    #[test]
    fn unconfirmed_purge_is_explained() {
        assert_eq!(
            command_error_message(Language::Es, &CommandError::Unconfirmed),
            Language::Es.text(Text::PurgeConfirm)
        );
        assert_eq!(
            command_error_message(Language::En, &CommandError::Unknown("dance".to_string())),
            "Unknown command: dance"
        );
    }
}
