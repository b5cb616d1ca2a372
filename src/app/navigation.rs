//! Navigation methods for the App.
//!
//! Keys map onto cursor moves, composer edits and [`NavEvent`]s; the router
//! decides whether an event applies, and the App loads data for the screen
//! it lands on.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::{App, Focus, COMPOSER_MAX_CHARS};
use crate::domain::{BackSource, NavEvent, Screen, Transition};
use crate::models::ThreadRef;

impl App {
    /// Dispatch `event` to the router and run the side effects of the move.
    pub fn navigate(&mut self, event: NavEvent) -> Transition {
        let transition = self.router.dispatch(event, &mut self.selection);
        if let Transition::Moved { from, to } = transition {
            self.focus = Focus::List;
            self.composer.clear();

            if from == Screen::Thread {
                // Thread screen unmounted
                self.router.dispatch(NavEvent::ThreadDismounted, &mut self.selection);
                self.replies.clear();
                self.reply_index = 0;
            }

            match (from, to) {
                (Screen::List, Screen::Channel) => {
                    self.messages.clear();
                    self.message_index = 0;
                    self.load_messages();
                }
                (Screen::Channel, Screen::Thread) => {
                    self.replies.clear();
                    self.reply_index = 0;
                    self.load_replies();
                }
                _ => {}
            }
        }
        self.mark_dirty();
        transition
    }

    /// Move the cursor of whatever has focus up one row.
    pub fn move_up(&mut self) {
        if self.router.overlay().is_open() {
            self.picker_index = self.picker_index.saturating_sub(1);
            return;
        }
        match self.screen() {
            Some(Screen::List) => self.channel_index = self.channel_index.saturating_sub(1),
            Some(Screen::Channel) => self.message_index = self.message_index.saturating_sub(1),
            Some(Screen::Thread) => self.reply_index = self.reply_index.saturating_sub(1),
            None => {}
        }
    }

    /// Move the cursor of whatever has focus down one row.
    pub fn move_down(&mut self) {
        fn step(index: &mut usize, len: usize) {
            if len > 0 && *index < len - 1 {
                *index += 1;
            }
        }

        if self.router.overlay().is_open() {
            step(&mut self.picker_index, self.settings.reactions.len());
            return;
        }
        match self.screen() {
            Some(Screen::List) => step(&mut self.channel_index, self.channels.len()),
            Some(Screen::Channel) => step(&mut self.message_index, self.messages.len()),
            Some(Screen::Thread) => step(&mut self.reply_index, self.replies.len()),
            None => {}
        }
    }

    /// Enter on the active list: open the channel or the message's thread.
    fn select_highlighted(&mut self) {
        match self.screen() {
            Some(Screen::List) => {
                if let Some(state) = self.highlighted_channel() {
                    let channel = state.channel.clone();
                    self.navigate(NavEvent::ChannelSelected(channel));
                }
            }
            Some(Screen::Channel) => {
                let thread = match (self.highlighted_message(), self.selection.channel()) {
                    (Some(message), Some(channel)) => {
                        Some(ThreadRef::from_message(message, channel.cid.clone()))
                    }
                    _ => None,
                };
                if let Some(thread) = thread {
                    self.navigate(NavEvent::ThreadSelected(thread));
                }
            }
            _ => {}
        }
    }

    /// Handle a key press. Returns false once the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.mark_dirty();

        // Global keybinds (always active)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return false;
        }

        // Nothing is interactive before the session is ready
        if !self.router.is_activated() {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.quit();
                return false;
            }
            return true;
        }

        if self.router.overlay().is_open() {
            self.handle_picker_key(key);
            return true;
        }

        if self.focus == Focus::Composer {
            self.handle_composer_key(key);
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return false;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Esc => {
                self.navigate(NavEvent::Back(BackSource::Gesture));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.navigate(NavEvent::Back(BackSource::HeaderButton));
            }
            KeyCode::Char('r') => self.open_reaction_picker(),
            KeyCode::Char('R') if self.screen() == Some(Screen::List) => {
                self.set_status("Refreshing channels");
                self.load_channels();
            }
            KeyCode::Char('i') | KeyCode::Tab => {
                if matches!(self.screen(), Some(Screen::Channel | Screen::Thread)) {
                    self.focus = Focus::Composer;
                }
            }
            other => debug!(?other, "Unbound key"),
        }
        true
    }

    /// Bracketed paste: lands in the composer as one line when it has focus.
    pub fn handle_paste(&mut self, text: &str) {
        if self.focus != Focus::Composer {
            return;
        }
        let room = COMPOSER_MAX_CHARS.saturating_sub(self.composer.chars().count());
        let flattened: String = text
            .chars()
            .map(|c| if matches!(c, '\r' | '\n') { ' ' } else { c })
            .take(room)
            .collect();
        self.composer.push_str(&flattened);
        self.mark_dirty();
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.router.close_overlay(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter => self.confirm_reaction(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.settings.reactions.len() {
                    self.picker_index = index;
                    self.confirm_reaction();
                }
            }
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Enter => self.send_composer(),
            KeyCode::Backspace => {
                self.composer.pop();
            }
            KeyCode::Char(c) if self.composer.chars().count() < COMPOSER_MAX_CHARS => {
                self.composer.push(c)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockChatBackend;
    use crate::app::tests::test_app;
    use crate::app::AppMessage;
    use crate::domain::{IgnoreReason, Overlay};
    use crate::models::{ChannelRef, ChannelState, ConnectedUser, Message, UserRef};

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ready_app() -> App {
        let mut app = test_app(MockChatBackend::new());
        let ticket = app.session.begin_connect().unwrap();
        app.pending_connect = Some(ticket);
        app.handle_message(AppMessage::ConnectFinished(Ok(ConnectedUser::new(
            UserRef::new("ron"),
        ))));
        app.handle_message(AppMessage::ChannelsLoaded(vec![
            ChannelState::new(ChannelRef::new("messaging", "general").with_name("General")),
            ChannelState::new(ChannelRef::new("messaging", "random")),
        ]));
        app
    }

    fn load_messages(app: &mut App) {
        let cid = app.selection.channel().unwrap().cid.clone();
        app.handle_message(AppMessage::MessagesLoaded {
            cid: cid.clone(),
            messages: vec![
                Message::new("m1", "one", UserRef::new("harry")).in_channel(cid.clone()),
                Message::new("m2", "two", UserRef::new("ron")).in_channel(cid),
            ],
        });
    }

    #[test]
    fn test_keys_ignored_before_ready() {
        let mut app = test_app(MockChatBackend::new());
        assert!(press(&mut app, KeyCode::Enter));
        assert!(press(&mut app, KeyCode::Down));
        assert_eq!(app.screen(), None);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_select_channel_then_thread_then_back() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Some(Screen::Channel));
        assert_eq!(app.selection.channel().unwrap().id, "general");

        load_messages(&mut app);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Some(Screen::Thread));
        assert_eq!(app.selection.thread().unwrap().message_id, "m1");

        // Thread header has no back button
        press(&mut app, KeyCode::Left);
        assert_eq!(app.screen(), Some(Screen::Thread));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Some(Screen::Channel));
        assert!(app.selection.thread().is_none());
        assert_eq!(app.selection.channel().unwrap().id, "general");

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen(), Some(Screen::List));
    }

    #[tokio::test]
    async fn test_escape_closes_picker_before_going_back() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Enter);
        load_messages(&mut app);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(
            app.router.overlay(),
            &Overlay::ReactionPicker {
                message_id: "m2".to_string()
            }
        );
        assert_eq!(
            app.navigate(NavEvent::Back(BackSource::Gesture)),
            Transition::Ignored(IgnoreReason::OverlayActive)
        );

        press(&mut app, KeyCode::Esc);
        assert!(!app.router.overlay().is_open());
        assert_eq!(app.screen(), Some(Screen::Channel));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Some(Screen::List));
    }

    #[tokio::test]
    async fn test_composer_focus_and_editing() {
        let mut app = ready_app();
        // No composer on the list
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.focus, Focus::List);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Composer);

        for c in "hiq".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.composer, "hi");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.screen(), Some(Screen::Channel));
    }

    #[tokio::test]
    async fn test_paste_only_reaches_focused_composer() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Enter);
        app.handle_paste("ignored");
        assert!(app.composer.is_empty());

        press(&mut app, KeyCode::Char('i'));
        app.handle_paste("line one\nline two");
        assert_eq!(app.composer, "line one line two");
    }

    #[tokio::test]
    async fn test_paste_is_capped_at_composer_limit() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('i'));
        app.handle_paste(&"a".repeat(COMPOSER_MAX_CHARS + 500));
        assert_eq!(app.composer.chars().count(), COMPOSER_MAX_CHARS);

        press(&mut app, KeyCode::Char('b'));
        app.handle_paste("more");
        assert_eq!(app.composer.chars().count(), COMPOSER_MAX_CHARS);
        assert!(!app.composer.contains('b'));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_anywhere() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        let keep_running =
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!keep_running);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_cursor_stays_in_bounds() {
        let mut app = ready_app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.channel_index, 1);
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('k'));
        }
        assert_eq!(app.channel_index, 0);
    }
}
