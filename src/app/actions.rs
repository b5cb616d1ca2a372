//! Backend calls spawned from the App.
//!
//! Each action clones what it needs, spawns a task and reports back through
//! [`AppMessage`]. Failures come back as `RequestFailed` and never touch the
//! session.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use super::{App, AppMessage, MESSAGE_PAGE_LIMIT, REPLY_PAGE_LIMIT};
use crate::domain::{Overlay, Screen};
use crate::error::BackendError;
use crate::models::NewMessage;
use crate::traits::ChatBackend;

impl App {
    /// Run `call` against the backend in a task and forward its result.
    fn spawn_call<F, Fut, T>(
        &self,
        operation: &'static str,
        call: F,
        on_ok: impl FnOnce(T) -> AppMessage + Send + 'static,
    ) where
        F: FnOnce(Arc<dyn ChatBackend>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, BackendError>> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(self.backend());
        let tx = self.message_tx.clone();
        debug!(operation, "Spawning backend call");
        tokio::spawn(async move {
            let msg = match call(backend).await {
                Ok(value) => on_ok(value),
                Err(error) => AppMessage::RequestFailed { operation, error },
            };
            let _ = tx.send(msg);
        });
    }

    /// Query the channel list with the session's list query.
    pub fn load_channels(&mut self) {
        if !self.session.is_ready() {
            return;
        }
        self.loading_channels = true;
        let query = self.settings.list_query.clone();
        self.spawn_call(
            "load channels",
            move |backend| async move { backend.query_channels(&query).await },
            AppMessage::ChannelsLoaded,
        );
    }

    /// Fetch messages for the selected channel.
    pub fn load_messages(&mut self) {
        let Some(channel) = self.selection.channel().cloned() else {
            return;
        };
        let cid = channel.cid.clone();
        self.spawn_call(
            "load messages",
            move |backend| async move {
                backend.channel_messages(&channel, MESSAGE_PAGE_LIMIT).await
            },
            move |messages| AppMessage::MessagesLoaded { cid, messages },
        );
    }

    /// Fetch replies for the selected thread.
    pub fn load_replies(&mut self) {
        let Some(thread) = self.selection.thread().cloned() else {
            return;
        };
        let message_id = thread.message_id.clone();
        self.spawn_call(
            "load replies",
            move |backend| async move { backend.thread_replies(&thread, REPLY_PAGE_LIMIT).await },
            move |replies| AppMessage::RepliesLoaded {
                message_id,
                replies,
            },
        );
    }

    /// Send the composer text to the selected channel, as a reply on the
    /// Thread screen. Empty input is ignored.
    pub fn send_composer(&mut self) {
        let text = self.composer.trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(channel) = self.selection.channel().cloned() else {
            return;
        };
        let message = match (self.screen(), self.selection.thread()) {
            (Some(Screen::Thread), Some(thread)) => {
                NewMessage::reply(text, thread.message_id.clone())
            }
            (Some(Screen::Channel), _) => NewMessage::text(text),
            _ => return,
        };

        self.composer.clear();
        self.mark_dirty();
        let cid = channel.cid.clone();
        self.spawn_call(
            "send message",
            move |backend| async move { backend.send_message(&channel, message).await },
            move |message| AppMessage::MessageSent { cid, message },
        );
    }

    /// Open the reaction picker on the highlighted message.
    pub fn open_reaction_picker(&mut self) {
        let Some(message_id) = self.highlighted_message().map(|m| m.id.clone()) else {
            return;
        };
        self.picker_index = 0;
        self.router.open_overlay(Overlay::ReactionPicker { message_id });
        self.mark_dirty();
    }

    /// Send the picker's highlighted reaction and close the picker.
    pub fn confirm_reaction(&mut self) {
        let Overlay::ReactionPicker { message_id } = self.router.overlay().clone() else {
            return;
        };
        self.router.close_overlay();
        self.mark_dirty();

        let Some(reaction) = self.settings.reactions.get(self.picker_index) else {
            return;
        };
        let kind = reaction.kind;
        self.spawn_call(
            "send reaction",
            move |backend| async move { backend.send_reaction(&message_id, kind).await },
            |message| AppMessage::ReactionSent { message },
        );
    }
}
