//! Channel list screen.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::models::ChannelState;

use super::helpers::{first_line, format_last_activity, truncate_string};
use super::theme::Palette;

/// Two-line row for one channel: name and time, then a preview of the last message.
fn channel_item(
    state: &ChannelState,
    width: u16,
    selected: bool,
    palette: &Palette,
) -> ListItem<'static> {
    let name = state.channel.display_name();
    let time = state
        .last_message()
        .map(|m| m.created_at)
        .or(state.channel.last_message_at)
        .map(|at| format_last_activity(at, Utc::now()))
        .unwrap_or_default();

    let marker = if selected { "▶ " } else { "  " };
    let name_width = (width as usize).saturating_sub(marker.width() + time.width() + 1);
    let name = truncate_string(name, name_width);
    let padding = name_width.saturating_sub(name.width());

    let name_style = if selected {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text)
    };

    let preview = match state.last_message() {
        Some(message) => format!(
            "{}: {}",
            message.user.display_name(),
            first_line(&message.text)
        ),
        None => "No messages yet".to_string(),
    };
    let preview = truncate_string(&preview, (width as usize).saturating_sub(2));

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.accent)),
            Span::styled(name, name_style),
            Span::raw(" ".repeat(padding + 1)),
            Span::styled(time, Style::default().fg(palette.dim)),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(preview, Style::default().fg(palette.dim)),
        ]),
    ])
}

pub fn render_channel_list(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    if app.channels.is_empty() {
        let text = if app.loading_channels {
            "Loading channels..."
        } else {
            "No channels yet. Press R to refresh"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(palette.dim),
            ))),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .channels
        .iter()
        .enumerate()
        .map(|(idx, state)| channel_item(state, area.width, idx == app.channel_index, palette))
        .collect();

    let mut state = ListState::default().with_selected(Some(app.channel_index));
    frame.render_stateful_widget(List::new(items), area, &mut state);
}
