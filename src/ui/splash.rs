//! Splash shown before the session is ready, and the fatal connect panel.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

use super::helpers::{centered_rect, spinner_frame};
use super::theme::Palette;

pub fn render_splash(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    match app.session.failure() {
        Some(failure) => {
            let hint = failure.category().recovery_hint();
            let lines = vec![
                Line::from(Span::styled(
                    "Could not connect",
                    Style::default()
                        .fg(palette.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    failure.user_message(),
                    Style::default().fg(palette.text),
                )),
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(palette.dim))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press q to quit",
                    Style::default().fg(palette.dim),
                )),
            ];
            let dialog = centered_rect(area, 60, 11);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.error))
                .style(Style::default().bg(palette.background));
            frame.render_widget(
                Paragraph::new(lines)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                dialog,
            );
        }
        None => {
            let user = app.session.identity().display_name();
            let line = Line::from(vec![
                Span::styled(
                    spinner_frame(app.tick_count),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    format!(" Connecting as {}...", user),
                    Style::default().fg(palette.dim),
                ),
            ]);
            let row = centered_rect(area, area.width, 1);
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
        }
    }
}
