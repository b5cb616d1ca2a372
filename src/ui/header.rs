//! Screen header rendering.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::ScreenProps;

use super::theme::Palette;

/// Back affordance shown at the left of the Channel header
pub const BACK_ARROW: &str = "‹";

/// Title and left-side affordance for the given props.
///
/// Returns `(left, title)`; `left` is empty when the screen has no back button.
pub fn header_parts(props: &ScreenProps<'_>) -> (String, String) {
    match props {
        ScreenProps::Splash => (String::new(), String::new()),
        ScreenProps::List(list) => (String::new(), list.title.to_string()),
        ScreenProps::Channel(channel) => (
            format!("{} {}", BACK_ARROW, channel.back_title),
            channel.header_title.unwrap_or_default().to_string(),
        ),
        ScreenProps::Thread(thread) => {
            let title = match thread.channel.map(|c| c.display_name()) {
                Some(name) if !name.is_empty() => format!("Thread in {}", name),
                _ => "Thread".to_string(),
            };
            let left = if thread.header_left_visible {
                format!("{} Back", BACK_ARROW)
            } else {
                String::new()
            };
            (left, title)
        }
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, props: &ScreenProps<'_>, palette: &Palette) {
    let (left, title) = header_parts(props);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title_line = Line::from(Span::styled(
        title,
        Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(title_line).alignment(Alignment::Center),
        inner,
    );

    if !left.is_empty() {
        let back = Line::from(vec![
            Span::raw(" "),
            Span::styled(left, Style::default().fg(palette.accent)),
        ]);
        frame.render_widget(Paragraph::new(back), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelListProps, ChannelProps, ThreadProps};
    use crate::models::{ChannelQuery, ChannelRef, UserRef, SUPPORTED_REACTIONS};

    #[test]
    fn test_list_header() {
        let query = ChannelQuery::for_user(&UserRef::new("ron"));
        let props = ScreenProps::List(ChannelListProps {
            query: &query,
            title: "Channel List",
        });
        assert_eq!(
            header_parts(&props),
            (String::new(), "Channel List".to_string())
        );
    }

    #[test]
    fn test_channel_header_blank_without_name() {
        let channel = ChannelRef::new("messaging", "ron-hermione");
        let props = ScreenProps::Channel(ChannelProps {
            channel: Some(&channel),
            header_title: None,
            back_title: "Back",
            reactions: &SUPPORTED_REACTIONS,
            thread: None,
            gesture_enabled: true,
        });
        let (left, title) = header_parts(&props);
        assert_eq!(left, "‹ Back");
        assert_eq!(title, "");
    }

    #[test]
    fn test_thread_header_has_no_back() {
        let channel = ChannelRef::new("messaging", "general").with_name("General");
        let props = ScreenProps::Thread(ThreadProps {
            channel: Some(&channel),
            thread: None,
            header_left_visible: false,
            gesture_enabled: true,
        });
        let (left, title) = header_parts(&props);
        assert!(left.is_empty());
        assert_eq!(title, "Thread in General");
    }
}
