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

//! Render the status line: toasts or key help on the left, who is signed
//! in, upload progress, event stats and playback order on the right.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App, UploadStatus,
    i18n::{Language, Text},
    render::icons::{ICON_UPLOAD, ICON_WARNING},
};

pub(crate) fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let language = app.language;

    let summary = status_summary(app);
    let summary_width = summary.chars().count() as u16 + 1;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(summary_width)])
        .horizontal_margin(1)
        .split(area);

    let left = match &app.toast {
        Some(toast) if toast.is_error => Line::from(vec![
            Span::styled(format!("{} ", ICON_WARNING), Style::default().fg(theme.error_fg)),
            Span::styled(toast.message.as_str(), Style::default().fg(theme.error_fg).add_modifier(Modifier::BOLD)),
        ]),
        Some(toast) => Line::from(Span::styled(
            toast.message.as_str(),
            Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(language.text(Text::Help), Style::default().fg(theme.muted_fg))),
    };
    f.render_widget(Paragraph::new(left), chunks[0]);

    f.render_widget(
        Paragraph::new(summary)
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.text_fg)),
        chunks[1],
    );
}

fn status_summary(app: &App) -> String {
    let language = app.language;
    let mut parts = Vec::new();

    parts.push(match &app.identity {
        Some(identity) => language.text(Text::Welcome).replace("{name}", &identity.display_name()),
        None => language.text(Text::Guest).to_string(),
    });

    if let Some(upload) = app.upload {
        parts.push(upload_label(language, upload));
    }

    if let Some(stats) = app.stats {
        parts.push(format!(
            "{} {}  {} {}",
            stats.photos,
            language.text(Text::Photos),
            stats.videos,
            language.text(Text::Videos)
        ));
    }

    parts.push(format!(
        "{}: {}",
        language.text(Text::Order),
        language.order_label(app.scheduler.order())
    ));

    parts.join(" | ")
}

fn upload_label(language: Language, status: UploadStatus) -> String {
    match status {
        UploadStatus::Sending(percent) => format!("{} {} {}%", ICON_UPLOAD, language.text(Text::Uploading), percent),
        UploadStatus::Retrying { attempt, attempts } => {
            format!("{} {} {}/{}", ICON_UPLOAD, language.text(Text::Uploading), attempt + 1, attempts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_label_shows_progress_and_retries() {
        assert_eq!(upload_label(Language::En, UploadStatus::Sending(40)), "\u{2191} Uploading 40%");
        assert_eq!(
            upload_label(Language::Es, UploadStatus::Retrying { attempt: 1, attempts: 3 }),
            "\u{2191} Subiendo 2/3"
        );
    }
}
