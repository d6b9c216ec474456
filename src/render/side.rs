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

//! Render the side panel.
//!
//! Lists either the slides coming up next in the show or the guest's own
//! uploads, with the admin stats underneath once they have been requested.

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{
    App, SidePanel,
    guest::caption_author,
    i18n::Text,
    model::AdminStats,
    render::icons::{ICON_STAR, kind_icon},
    theme::Theme,
    util::format::format_bytes,
};

const UPCOMING_LIMIT: usize = 50;

pub(crate) fn draw_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let admin_height = if app.admin_stats.is_some() { 7 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(admin_height)])
        .split(area);

    match app.side_panel {
        SidePanel::UpNext => draw_up_next(f, chunks[0], app),
        SidePanel::MyUploads => draw_my_uploads(f, chunks[0], app),
    }

    if let Some(stats) = &app.admin_stats {
        draw_admin_stats(f, chunks[1], stats, &app.theme);
    }
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
}

fn draw_up_next(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let guest = app.language.text(Text::Guest);

    let items: Vec<ListItem> = app
        .scheduler
        .queue()
        .upcoming(UPCOMING_LIMIT)
        .into_iter()
        .map(|item| {
            let mut spans = vec![
                Span::styled(format!("{} ", kind_icon(item.kind)), Style::default().fg(theme.accent_colour)),
                Span::styled(caption_author(item.author.as_deref(), guest), Style::default().fg(theme.author_fg)),
            ];
            if item.is_starred {
                spans.push(Span::styled(format!(" {}", ICON_STAR), Style::default().fg(theme.banner_fg)));
            }
            if let Some(caption) = item.caption.as_deref().filter(|caption| !caption.trim().is_empty()) {
                spans.push(Span::styled(format!("  {}", caption.trim()), Style::default().fg(theme.caption_fg)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = app.language.text(Text::UpNext);
    let list = List::new(items)
        .block(panel_block(title, theme))
        .style(Style::default().fg(theme.text_fg));

    f.render_widget(list, area);
}

fn draw_my_uploads(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = panel_block(app.language.text(Text::YourUploads), theme);

    if app.my_uploads.is_empty() {
        let empty = Paragraph::new(app.language.text(Text::NoUploads))
            .style(Style::default().fg(theme.muted_fg))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .my_uploads
        .iter()
        .map(|upload| {
            let created = upload.created_at.with_timezone(&Local).format("%d %b %H:%M");
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", kind_icon(upload.kind)), Style::default().fg(theme.accent_colour)),
                Span::styled(format!("#{}", upload.id.0), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {} | {}", created, format_bytes(upload.file_size.unwrap_or(0))),
                    Style::default().fg(theme.muted_fg),
                ),
            ])];
            if let Some(caption) = upload.caption.as_deref().filter(|caption| !caption.trim().is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", caption.trim()),
                    Style::default().fg(theme.caption_fg),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(block).style(Style::default().fg(theme.text_fg));
    f.render_widget(list, area);
}

fn draw_admin_stats(f: &mut Frame, area: Rect, stats: &AdminStats, theme: &Theme) {
    let percent = |value: Option<f64>| value.map_or("-".to_string(), |value| format!("{:.0}%", value));
    let gigabytes = |value: Option<f64>| value.map_or("-".to_string(), |value| format!("{:.1} GB", value));

    let lines = vec![
        Line::from(format!(
            "media {}  ({} photos, {} videos)",
            stats.media_total, stats.media_photos, stats.media_videos
        )),
        Line::from(format!(
            "disk {} / {}  free {}",
            gigabytes(stats.disk_used_gb),
            gigabytes(stats.disk_total_gb),
            gigabytes(stats.disk_free_gb)
        )),
        Line::from(format!("cpu {}  ram {}", percent(stats.cpu_percent), percent(stats.ram_percent))),
        Line::from(format!("backup {}", stats.last_backup.as_deref().unwrap_or("-"))),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.muted_fg))
        .block(panel_block("Admin", theme));
    f.render_widget(paragraph, area);
}
