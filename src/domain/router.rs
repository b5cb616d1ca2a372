//! Screen router: the List → Channel → Thread navigation stack.
//!
//! The router is the only writer of the [`SelectionStore`]. It changes screen
//! only in response to explicit [`NavEvent`]s, and an event that does not fit
//! the current screen is ignored, so the active screen is always one of the
//! three once activated.

use tracing::{debug, info};

use super::selection::SelectionStore;
use super::session::SessionManager;
use crate::models::{ChannelRef, ThreadRef};

/// Represents which screen is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    List,
    Channel,
    Thread,
}

impl Screen {
    /// Whether the screen header offers a back button.
    ///
    /// The list is the root and the thread header hides its back button, so
    /// only the channel screen has one.
    pub fn has_header_back_button(self) -> bool {
        matches!(self, Screen::Channel)
    }
}

/// Modal overlay covering the active screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// Reaction picker for a message
    ReactionPicker { message_id: String },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }
}

/// Where a back request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackSource {
    /// Swipe/escape style back, disabled while an overlay is open
    Gesture,
    /// The header's back button
    HeaderButton,
}

/// Navigation events emitted by the screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    ChannelSelected(ChannelRef),
    ThreadSelected(ThreadRef),
    Back(BackSource),
    ThreadDismounted,
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The session is not ready yet
    NotActivated,
    /// The selected channel has no id
    InvalidChannel,
    /// Thread selection without a selected channel
    NoSelectedChannel,
    /// The event does not apply to the active screen
    WrongScreen,
    /// Gesture back while an overlay is open
    OverlayActive,
    /// Header back on a screen without a back button
    NoBackButton,
    /// Back on the root screen
    AtRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Screen, to: Screen },
    /// State changed but the screen did not
    Unchanged,
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn moved_to(&self) -> Option<Screen> {
        match self {
            Transition::Moved { to, .. } => Some(*to),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    /// `None` until the session is ready
    screen: Option<Screen>,
    overlay: Overlay,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the stack on the List screen once `session` is ready.
    ///
    /// Returns false (and stays un-activated) otherwise. Activating twice
    /// keeps the current screen.
    pub fn activate(&mut self, session: &SessionManager) -> bool {
        if !session.is_ready() {
            debug!(state = ?session.state(), "Router activation refused, session not ready");
            return false;
        }
        if self.screen.is_none() {
            info!("Router activated on channel list");
            self.screen = Some(Screen::List);
        }
        true
    }

    pub fn is_activated(&self) -> bool {
        self.screen.is_some()
    }

    pub fn screen(&self) -> Option<Screen> {
        self.screen
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn open_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Gesture back is only enabled with no overlay open.
    pub fn gesture_enabled(&self) -> bool {
        !self.overlay.is_open()
    }

    /// Apply `event`, writing the selection where the transition requires it.
    pub fn dispatch(&mut self, event: NavEvent, selection: &mut SelectionStore) -> Transition {
        let transition = self.apply(event, selection);
        match transition {
            Transition::Moved { from, to } => {
                self.overlay = Overlay::None;
                info!(?from, ?to, "Screen transition");
            }
            Transition::Unchanged => debug!("Navigation event handled without transition"),
            Transition::Ignored(reason) => {
                debug!(?reason, screen = ?self.screen, "Navigation event ignored")
            }
        }
        transition
    }

    fn apply(&mut self, event: NavEvent, selection: &mut SelectionStore) -> Transition {
        let Some(current) = self.screen else {
            return Transition::Ignored(IgnoreReason::NotActivated);
        };

        match (current, event) {
            (Screen::List, NavEvent::ChannelSelected(channel)) => {
                if !channel.has_id() {
                    return Transition::Ignored(IgnoreReason::InvalidChannel);
                }
                selection.set_channel(channel);
                self.move_to(current, Screen::Channel)
            }
            (_, NavEvent::ChannelSelected(_)) => Transition::Ignored(IgnoreReason::WrongScreen),

            (Screen::Channel, NavEvent::ThreadSelected(thread)) => {
                if !selection.has_navigable_channel() {
                    return Transition::Ignored(IgnoreReason::NoSelectedChannel);
                }
                selection.set_thread(Some(thread));
                self.move_to(current, Screen::Thread)
            }
            (_, NavEvent::ThreadSelected(_)) => Transition::Ignored(IgnoreReason::WrongScreen),

            (screen, NavEvent::Back(source)) => self.back(screen, source, selection),

            (Screen::Thread, NavEvent::ThreadDismounted) => {
                selection.clear_thread();
                self.move_to(current, Screen::Channel)
            }
            (_, NavEvent::ThreadDismounted) => {
                selection.clear_thread();
                Transition::Unchanged
            }
        }
    }

    fn back(
        &mut self,
        screen: Screen,
        source: BackSource,
        selection: &mut SelectionStore,
    ) -> Transition {
        if screen == Screen::List {
            return Transition::Ignored(IgnoreReason::AtRoot);
        }
        match source {
            BackSource::Gesture if self.overlay.is_open() => {
                return Transition::Ignored(IgnoreReason::OverlayActive);
            }
            BackSource::HeaderButton if !screen.has_header_back_button() => {
                return Transition::Ignored(IgnoreReason::NoBackButton);
            }
            _ => {}
        }

        match screen {
            Screen::Thread => {
                selection.clear_thread();
                self.move_to(screen, Screen::Channel)
            }
            // The selected channel is left as-is when returning to the list.
            Screen::Channel => self.move_to(screen, Screen::List),
            Screen::List => Transition::Ignored(IgnoreReason::AtRoot),
        }
    }

    fn move_to(&mut self, from: Screen, to: Screen) -> Transition {
        self.screen = Some(to);
        Transition::Moved { from, to }
    }
}
