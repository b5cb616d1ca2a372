//! Reaction picker overlay.
//!
//! Lists the supported reactions in order over the Channel or Thread screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::domain::Overlay;

use super::helpers::centered_rect;
use super::theme::Palette;

/// Render the picker as a centered dialog when it is open.
pub fn render_reaction_picker(frame: &mut Frame, app: &App, palette: &Palette) {
    let Overlay::ReactionPicker { .. } = app.router.overlay() else {
        return;
    };
    let reactions = &app.settings.reactions;
    if reactions.is_empty() {
        return;
    }

    let area = frame.area();
    // Height: 2 (borders) + 1 (padding top) + reactions + 1 (padding bottom) + 1 (hint line)
    let dialog_area = centered_rect(area, 36, reactions.len() as u16 + 5);

    // Clear the background behind the dialog
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(Span::styled(
            " React ",
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.background));
    frame.render_widget(block, dialog_area);

    let inner = Rect {
        x: dialog_area.x + 2,
        y: dialog_area.y + 1,
        width: dialog_area.width.saturating_sub(4),
        height: dialog_area.height.saturating_sub(2),
    };

    let own = app.highlighted_message();
    let mut lines: Vec<Line> = vec![Line::from("")];
    for (idx, reaction) in reactions.iter().enumerate() {
        let is_selected = idx == app.picker_index;
        let marker = if is_selected { "▶ " } else { "  " };
        let name_style = if is_selected {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        let mine = own.is_some_and(|m| m.has_own_reaction(reaction.kind));

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.accent)),
            Span::styled(format!("{} ", idx + 1), Style::default().fg(palette.dim)),
            Span::raw(format!("{}  ", reaction.glyph)),
            Span::styled(reaction.name, name_style),
            Span::styled(if mine { "  ✓" } else { "" }, Style::default().fg(palette.dim)),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(palette.accent)),
        Span::styled(": react  ", Style::default().fg(palette.dim)),
        Span::styled("Esc", Style::default().fg(palette.accent)),
        Span::styled(": cancel", Style::default().fg(palette.dim)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
