//! UI rendering for the chat client
//!
//! Renders whatever [`ScreenProps`] the presentation adapter produces:
//! - Splash (connecting, or the fatal connect panel)
//! - Channel list
//! - Channel messages with a composer
//! - Thread root and replies with a composer
//!
//! The reaction picker overlay is drawn last, above any screen.

mod channel_list;
mod header;
mod helpers;
pub mod input;
mod messages;
mod reaction_picker;
mod splash;
mod theme;

pub use theme::{hex_to_color, Palette, COLOR_ACCENT, COLOR_DIM, COLOR_ERROR};

use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::App;
use crate::domain::ScreenProps;
use channel_list::render_channel_list;
use header::render_header;
use input::{render_composer, render_footer};
use messages::{render_channel_messages, render_thread};
use reaction_picker::render_reaction_picker;
use splash::render_splash;

// ============================================================================
// Main UI Rendering
// ============================================================================

/// Render the UI for the current screen
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::from_tokens(&app.settings.theme);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let props = app.props();
    if let ScreenProps::Splash = props {
        render_splash(frame, area, app, &palette);
        return;
    }

    let has_composer = matches!(props, ScreenProps::Channel(_) | ScreenProps::Thread(_));
    let [header_area, body_area, composer_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(if has_composer { 3 } else { 0 }),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area, &props, &palette);
    match props {
        ScreenProps::Splash => {}
        ScreenProps::List(_) => render_channel_list(frame, body_area, app, &palette),
        ScreenProps::Channel(_) => render_channel_messages(frame, body_area, app, &palette),
        ScreenProps::Thread(_) => render_thread(frame, body_area, app, &palette),
    }
    if has_composer {
        render_composer(frame, composer_area, app, &palette);
    }
    render_footer(frame, footer_area, app, &palette);

    render_reaction_picker(frame, app, &palette);
}
