//! Composer box and key hints.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::domain::Screen;

use super::theme::Palette;

/// Key hints for the current screen and focus, as `(key, action)` pairs.
pub fn build_keybinds(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.router.overlay().is_open() {
        return vec![("↑↓", "choose"), ("Enter", "react"), ("Esc", "cancel")];
    }
    if app.focus == Focus::Composer {
        return vec![("Enter", "send"), ("Esc", "stop typing")];
    }
    match app.screen() {
        None => vec![("q", "quit")],
        Some(Screen::List) => vec![
            ("↑↓", "move"),
            ("Enter", "open"),
            ("R", "refresh"),
            ("q", "quit"),
        ],
        Some(Screen::Channel) => vec![
            ("↑↓", "move"),
            ("Enter", "thread"),
            ("r", "react"),
            ("i", "write"),
            ("←", "back"),
            ("q", "quit"),
        ],
        Some(Screen::Thread) => vec![
            ("↑↓", "move"),
            ("r", "react"),
            ("i", "reply"),
            ("Esc", "back"),
            ("q", "quit"),
        ],
    }
}

pub fn render_composer(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.focus == Focus::Composer;
    let placeholder = match app.screen() {
        Some(Screen::Thread) => "Reply to thread",
        _ => "Send a message",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            palette.accent
        } else {
            palette.border
        }));
    let inner = block.inner(area);

    let line = if app.composer.is_empty() && !focused {
        Line::from(Span::styled(placeholder, Style::default().fg(palette.dim)))
    } else {
        Line::from(Span::styled(
            app.composer.as_str(),
            Style::default().fg(palette.text),
        ))
    };

    // Keep the end of long input visible
    let text_width = u16::try_from(app.composer.width()).unwrap_or(u16::MAX);
    let scroll = text_width.saturating_add(1).saturating_sub(inner.width);
    frame.render_widget(Paragraph::new(line).block(block).scroll((0, scroll)), area);

    if focused {
        let x = inner.x + text_width.min(inner.width.saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

/// Status line when one is showing, otherwise the key hints.
pub fn render_footer(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(if status.is_error {
                palette.error
            } else {
                palette.dim
            }),
        )),
        None => {
            let mut spans = vec![Span::raw(" ")];
            for (key, action) in build_keybinds(app) {
                spans.push(Span::styled(key, Style::default().fg(palette.accent)));
                spans.push(Span::styled(
                    format!(": {}  ", action),
                    Style::default().fg(palette.dim),
                ));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}
