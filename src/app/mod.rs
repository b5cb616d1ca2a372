//! Application state and logic for the TUI.
//!
//! This module contains the core [`App`] struct and related types:
//! - [`Focus`] - Which UI component has focus
//! - [`AppMessage`] - Messages for async communication
//!
//! `App` owns the session, router and selection and hands them to the domain
//! layer explicitly. Backend calls run in spawned tasks that report back
//! through [`AppMessage`]; only the event loop mutates `App`.

mod actions;
mod handlers;
mod messages;
mod navigation;
mod types;

pub use messages::AppMessage;
pub use types::{DeliveredIds, Focus, StatusLine, COMPOSER_MAX_CHARS, STATUS_TTL_TICKS};

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::{
    present, PresentationSettings, Router, Screen, ScreenProps, SelectionStore, SessionManager,
};
use crate::domain::ConnectTicket;
use crate::models::{ChannelState, Message, UserRef, UserToken};
use crate::traits::ChatBackend;

/// Number of channel messages fetched when a channel opens.
pub const MESSAGE_PAGE_LIMIT: u32 = 50;
/// Number of replies fetched when a thread opens.
pub const REPLY_PAGE_LIMIT: u32 = 50;
/// Message ids remembered for duplicate delivery checks.
pub const DELIVERED_ID_CAPACITY: usize = 1024;

/// Main application state
pub struct App {
    pub session: SessionManager,
    pub router: Router,
    pub selection: SelectionStore,
    pub settings: PresentationSettings,
    backend: Arc<dyn ChatBackend>,
    /// Channel list rows, newest activity first
    pub channels: Vec<ChannelState>,
    pub channel_index: usize,
    /// Top-level messages of the selected channel
    pub messages: Vec<Message>,
    pub message_index: usize,
    /// Replies of the selected thread
    pub replies: Vec<Message>,
    pub reply_index: usize,
    /// New messages already applied, whichever screen was open
    pub delivered: DeliveredIds,
    /// Highlighted entry in the reaction picker
    pub picker_index: usize,
    pub composer: String,
    pub focus: Focus,
    pub status: Option<StatusLine>,
    /// True while the channel list query is in flight
    pub loading_channels: bool,
    pending_connect: Option<ConnectTicket>,
    /// Sender handed to spawned tasks
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Dirty flag: set whenever visible state changes
    pub needs_redraw: bool,
    pub should_quit: bool,
    /// Tick counter for the spinner and status expiry
    pub tick_count: u64,
}

impl App {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        identity: UserRef,
        credential: UserToken,
        settings: PresentationSettings,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            session: SessionManager::new(identity, credential),
            router: Router::new(),
            selection: SelectionStore::new(),
            settings,
            backend,
            channels: Vec::new(),
            channel_index: 0,
            messages: Vec::new(),
            message_index: 0,
            replies: Vec::new(),
            reply_index: 0,
            delivered: DeliveredIds::with_capacity(DELIVERED_ID_CAPACITY),
            picker_index: 0,
            composer: String::new(),
            focus: Focus::List,
            status: None,
            loading_channels: false,
            pending_connect: None,
            message_tx,
            message_rx: Some(message_rx),
            // Start with redraw needed
            needs_redraw: true,
            should_quit: false,
            tick_count: 0,
        }
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Mark the UI as needing a redraw
    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Advance the animation tick and expire the status line.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if !self.session.is_ready() && self.session.failure().is_none() {
            // Splash spinner
            self.mark_dirty();
        }
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.is_expired(self.tick_count))
        {
            self.status = None;
            self.mark_dirty();
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine::info(text, self.tick_count));
        self.mark_dirty();
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine::error(text, self.tick_count));
        self.mark_dirty();
    }

    /// Start the single connect attempt and the event forwarder.
    ///
    /// Nothing backend-dependent renders until the attempt completes.
    pub fn start_session(&mut self) {
        let ticket = match self.session.begin_connect() {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("Session already started: {}", e);
                return;
            }
        };
        self.pending_connect = Some(ticket);

        let backend = Arc::clone(&self.backend);
        let tx = self.message_tx.clone();
        let identity = self.session.identity().clone();
        let credential = self.session.credential().clone();
        tokio::spawn(async move {
            let result = backend.connect_user(&identity, &credential).await;
            let _ = tx.send(AppMessage::ConnectFinished(result));
        });

        let mut events = self.backend.subscribe();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(AppMessage::Backend(event)).is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} backend events", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Finish the connect attempt; activates the router on success.
    pub(crate) fn finish_connect(
        &mut self,
        result: Result<crate::models::ConnectedUser, crate::error::BackendError>,
    ) {
        let Some(ticket) = self.pending_connect.take() else {
            warn!("Connect result without a pending attempt");
            return;
        };
        match self.session.complete(ticket, result) {
            Ok(ready) => {
                info!(user_id = %ready.user.user.id, "Session ready, showing channel list");
                if self.router.activate(&self.session) {
                    self.load_channels();
                }
            }
            Err(e) => {
                // Fatal: the router never activates and the failure panel stays up.
                warn!("Session failed: {}", e);
            }
        }
        self.mark_dirty();
    }

    /// Props for the current screen.
    pub fn props(&self) -> ScreenProps<'_> {
        present(&self.router, &self.selection, &self.settings)
    }

    pub fn screen(&self) -> Option<Screen> {
        self.router.screen()
    }

    /// Channel row under the cursor.
    pub fn highlighted_channel(&self) -> Option<&ChannelState> {
        self.channels.get(self.channel_index)
    }

    /// Message under the cursor on the Channel or Thread screen.
    ///
    /// On the Thread screen an empty reply list falls back to the root.
    pub fn highlighted_message(&self) -> Option<&Message> {
        match self.router.screen()? {
            Screen::List => None,
            Screen::Channel => self.messages.get(self.message_index),
            Screen::Thread => self.replies.get(self.reply_index).or_else(|| {
                let thread = self.selection.thread()?;
                self.messages.iter().find(|m| m.id == thread.message_id)
            }),
        }
    }

    /// Root message of the open thread, if it is among the loaded messages.
    pub fn thread_root(&self) -> Option<&Message> {
        let thread = self.selection.thread()?;
        self.messages.iter().find(|m| m.id == thread.message_id)
    }
}
