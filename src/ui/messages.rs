//! Message rendering for the Channel and Thread screens.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::models::{Message, ReactionSet, ThreadRef};

use super::helpers::format_time;
use super::theme::Palette;

/// Rows the thread root may take above the replies
const MAX_ROOT_ROWS: u16 = 6;

/// Hard-wrap `text` to `width` display columns, keeping explicit newlines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let mut row = String::new();
        let mut row_width = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(c);
            row_width += w;
        }
        rows.push(row);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Reaction glyphs with counts, e.g. `👍🏽 2  🦆 1`.
pub fn reaction_line(message: &Message, reactions: &ReactionSet) -> Option<String> {
    let summary = message.reaction_summary(reactions);
    if summary.is_empty() {
        return None;
    }
    Some(
        summary
            .iter()
            .map(|(glyph, count)| format!("{} {}", glyph, count))
            .collect::<Vec<_>>()
            .join("  "),
    )
}

pub fn replies_label(count: u32) -> String {
    match count {
        1 => "1 reply".to_string(),
        n => format!("{} replies", n),
    }
}

/// Lines for one message: author and time, wrapped text, reactions and
/// (on the Channel screen) the reply count.
fn message_lines(
    message: &Message,
    reactions: &ReactionSet,
    width: u16,
    selected: bool,
    show_replies: bool,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let marker = if selected { "▶ " } else { "  " };
    let author_style = if selected {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(marker, Style::default().fg(palette.accent)),
        Span::styled(message.user.display_name().to_string(), author_style),
        Span::styled(
            format!("  {}", format_time(message.created_at)),
            Style::default().fg(palette.dim),
        ),
    ])];

    for row in wrap_text(&message.text, (width as usize).saturating_sub(2)) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(row, Style::default().fg(palette.text)),
        ]));
    }

    if let Some(summary) = reaction_line(message, reactions) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(summary, Style::default().fg(palette.dim)),
        ]));
    }

    if show_replies && message.has_thread() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                replies_label(message.reply_count),
                Style::default().fg(palette.accent),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines
}

fn render_message_list(
    frame: &mut Frame,
    area: Rect,
    messages: &[Message],
    selected: usize,
    show_replies: bool,
    reactions: &ReactionSet,
    palette: &Palette,
) {
    let items: Vec<ListItem> = messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            ListItem::new(message_lines(
                message,
                reactions,
                area.width,
                idx == selected,
                show_replies,
                palette,
            ))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(List::new(items), area, &mut state);
}

fn render_empty(frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(palette.dim),
        ))),
        area,
    );
}

pub fn render_channel_messages(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    if app.messages.is_empty() {
        render_empty(frame, area, "No messages yet. Press i to write one", palette);
        return;
    }
    render_message_list(
        frame,
        area,
        &app.messages,
        app.message_index,
        true,
        &app.settings.reactions,
        palette,
    );
}

/// Thread root: the loaded message when available, else what the
/// [`ThreadRef`] captured when the thread was opened.
fn root_lines(app: &App, thread: &ThreadRef, width: u16, palette: &Palette) -> Vec<Line<'static>> {
    let highlight_root = app.replies.is_empty();
    match app.thread_root() {
        Some(root) => message_lines(
            root,
            &app.settings.reactions,
            width,
            highlight_root,
            false,
            palette,
        ),
        None => {
            let fallback = Message::new(
                thread.message_id.clone(),
                thread.text.clone(),
                thread.author.clone(),
            );
            message_lines(
                &fallback,
                &app.settings.reactions,
                width,
                highlight_root,
                false,
                palette,
            )
        }
    }
}

pub fn render_thread(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(thread) = app.selection.thread() else {
        render_empty(frame, area, "Thread closed", palette);
        return;
    };

    let mut root = root_lines(app, thread, area.width, palette);
    // Trailing blank row is replaced by the divider
    root.pop();
    let root_height = (root.len() as u16).min(MAX_ROOT_ROWS);

    let [root_area, divider_area, replies_area] = Layout::vertical([
        Constraint::Length(root_height),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(root), root_area);

    let count = app
        .thread_root()
        .map(|m| m.reply_count)
        .unwrap_or(thread.reply_count)
        .max(app.replies.len() as u32);
    frame.render_widget(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                format!(" {} ", replies_label(count)),
                Style::default().fg(palette.dim),
            )),
        divider_area,
    );

    if app.replies.is_empty() {
        render_empty(frame, replies_area, "  No replies yet", palette);
        return;
    }
    render_message_list(
        frame,
        replies_area,
        &app.replies,
        app.reply_index,
        false,
        &app.settings.reactions,
        palette,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserRef, SUPPORTED_REACTIONS};

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", " worl", "d"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_counts_wide_glyphs() {
        // Each duck is two columns wide
        assert_eq!(wrap_text("🦆🦆🦆", 4), vec!["🦆🦆", "🦆"]);
    }

    #[test]
    fn test_reaction_line_in_picker_order() {
        let mut message = Message::new("m1", "hi", UserRef::new("ron"));
        assert_eq!(reaction_line(&message, &SUPPORTED_REACTIONS), None);

        message.add_reaction("duck", "harry");
        message.add_reaction("like", "ron");
        message.add_reaction("like", "hermione");
        assert_eq!(
            reaction_line(&message, &SUPPORTED_REACTIONS).unwrap(),
            "👍🏽 2  🦆 1"
        );
    }

    #[test]
    fn test_replies_label() {
        assert_eq!(replies_label(1), "1 reply");
        assert_eq!(replies_label(3), "3 replies");
    }
}
