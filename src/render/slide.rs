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

//! Render the slide panel.
//!
//! Shows what the MPV window is displaying: media type, caption overlay,
//! author and elapsed time, with the entry transition approximated in the
//! terminal. Between slides it shows the waiting notice.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::{
    App,
    guest::caption_author,
    i18n::Text,
    render::icons::{ICON_LIVE, ICON_STAR, kind_icon},
    slideshow::{PlaybackState, stage::Transition},
    util::format::format_time,
};

pub(crate) fn draw_slide(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let language = app.language;

    let title = Line::from(vec![
        Span::styled(format!(" {} ", ICON_LIVE), Style::default().fg(theme.error_fg)),
        Span::styled(
            format!("{} ", language.text(Text::LiveFeed)),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(theme.accent_colour),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::uniform(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let stage = app.scheduler.host().stage();
    let Some(slide) = stage.current() else {
        let notice = match app.scheduler.state() {
            PlaybackState::Retrying => Text::Waiting,
            _ => Text::Loading,
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(inner_area);
        f.render_widget(
            Paragraph::new(language.text(notice))
                .alignment(Alignment::Center)
                .fg(theme.muted_fg),
            rows[1],
        );
        return;
    };

    let now = Instant::now();
    let progress = stage.transition_progress(now, app.transition_window);
    let content_area = transition_area(inner_area, slide.transition, progress);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(content_area);

    let item = &slide.item;
    let mut header = vec![
        Span::styled(format!("{} ", kind_icon(item.kind)), Style::default().add_modifier(Modifier::BOLD))
            .fg(theme.accent_colour),
        Span::styled(format!("#{}", item.id.0), Style::default().fg(theme.muted_fg)),
    ];
    if item.is_starred {
        header.push(Span::styled(format!(" {}", ICON_STAR), Style::default().fg(theme.banner_fg)));
    }

    let mut lines = vec![Line::from(header), Line::default()];
    if let Some(caption) = item.caption.as_deref().map(str::trim).filter(|caption| !caption.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("\u{201C}{}\u{201D}", caption),
            Style::default().fg(theme.caption_fg).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(Span::styled(
        caption_author(item.author.as_deref(), language.text(Text::Guest)),
        Style::default().fg(theme.author_fg).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(slide.url.as_str(), Style::default().fg(theme.muted_fg))));

    let mut paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).fg(theme.text_fg);
    if slide.transition == Transition::Fade && progress.is_some_and(|p| p < 0.5) {
        paragraph = paragraph.add_modifier(Modifier::DIM);
    }
    f.render_widget(paragraph, chunks[0]);

    // The queue's copy of the item carries the measured video duration.
    let on_screen = app
        .scheduler
        .queue()
        .current()
        .filter(|current| current.id == item.id)
        .unwrap_or(item);
    let total = app.scheduler.timing().advance_delay(on_screen);
    let elapsed = now.saturating_duration_since(slide.shown_at).min(total);
    let ratio = if total.is_zero() {
        0.0
    } else {
        (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    };

    let elapsed_gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent_colour).bg(theme.gauge_track_colour))
        .ratio(ratio)
        .label(format!(
            "{} / {}",
            format_time(elapsed.as_secs()),
            format_time(total.as_secs())
        ))
        .use_unicode(true);
    f.render_widget(elapsed_gauge, chunks[1]);
}

/// Where the slide content is drawn while its entry transition runs:
/// sliding in from the right, or growing from the centre.
fn transition_area(area: Rect, transition: Transition, progress: Option<f64>) -> Rect {
    let Some(progress) = progress else {
        return area;
    };
    let remaining = 1.0 - progress.clamp(0.0, 1.0);

    match transition {
        Transition::Fade => area,
        Transition::Slide => {
            let offset = (remaining * f64::from(area.width)) as u16;
            Rect {
                x: area.x + offset,
                width: area.width - offset,
                ..area
            }
        }
        Transition::Zoom => {
            let inset_x = (remaining * f64::from(area.width / 4)) as u16;
            let inset_y = (remaining * f64::from(area.height / 4)) as u16;
            Rect {
                x: area.x + inset_x,
                y: area.y + inset_y,
                width: area.width - 2 * inset_x,
                height: area.height - 2 * inset_y,
            }
        }
    }
}
