//! Message handling for the App.

use tracing::{debug, info, warn};

use super::{App, AppMessage};
use crate::domain::Screen;
use crate::models::{sort_by_last_message, Message};
use crate::traits::BackendEvent;

/// Insert `message` or replace the entry with the same id.
fn upsert(list: &mut Vec<Message>, message: Message) {
    match list.iter_mut().find(|m| m.id == message.id) {
        Some(existing) => *existing = message,
        None => list.push(message),
    }
}

/// Replace the entry with the same id, if present.
fn replace(list: &mut [Message], message: &Message) -> bool {
    match list.iter_mut().find(|m| m.id == message.id) {
        Some(existing) => {
            *existing = message.clone();
            true
        }
        None => false,
    }
}

impl App {
    /// Handle an incoming async message
    /// All message handlers mark the app as dirty since they update visible state.
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::ConnectFinished(result) => self.finish_connect(result),
            AppMessage::ChannelsLoaded(channels) => {
                info!(count = channels.len(), "Channel list loaded");
                let highlighted = self.highlighted_channel().map(|c| c.channel.cid.clone());
                self.channels = channels;
                self.loading_channels = false;
                self.channel_index = highlighted
                    .and_then(|cid| self.channels.iter().position(|c| c.channel.cid == cid))
                    .unwrap_or(0);
            }
            AppMessage::MessagesLoaded { cid, messages } => {
                if self.selection.channel().map(|c| c.cid.as_str()) != Some(cid.as_str()) {
                    debug!(cid = %cid, "Dropping messages for a channel no longer selected");
                    return;
                }
                self.messages = messages.into_iter().filter(|m| !m.is_reply()).collect();
                self.message_index = self.messages.len().saturating_sub(1);
            }
            AppMessage::RepliesLoaded {
                message_id,
                replies,
            } => {
                if self.selection.thread().map(|t| t.message_id.as_str())
                    != Some(message_id.as_str())
                {
                    debug!(message_id = %message_id, "Dropping replies for a closed thread");
                    return;
                }
                self.replies = replies;
                self.reply_index = self.replies.len().saturating_sub(1);
            }
            AppMessage::MessageSent { cid, message } => {
                self.apply_new_message(&cid, message);
            }
            AppMessage::ReactionSent { message } => {
                self.apply_updated_message(message);
            }
            AppMessage::Backend(event) => self.handle_backend_event(event),
            AppMessage::RequestFailed { operation, error } => {
                warn!(operation, category = %error.category(), "Backend call failed: {}", error);
                if operation == "load channels" {
                    self.loading_channels = false;
                }
                self.set_error(format!("Could not {}: {}", operation, error.user_message()));
            }
        }
    }

    fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::MessageNew { cid, message } => self.apply_new_message(&cid, message),
            BackendEvent::MessageUpdated { message, .. }
            | BackendEvent::ReactionNew { message, .. } => self.apply_updated_message(message),
            BackendEvent::ConnectionChanged { online } => {
                if !online && self.session.is_ready() {
                    self.set_error("Connection to the chat service lost");
                }
            }
        }
    }

    /// Fold a new message into the list, the open channel and the open thread.
    ///
    /// The same message can arrive twice (send result and socket echo); the
    /// second copy replaces the first and never bumps a reply count again.
    fn apply_new_message(&mut self, cid: &str, message: Message) {
        let highlighted = self.highlighted_channel().map(|c| c.channel.cid.clone());
        let first_delivery = self.delivered.insert(&message.id);
        let seen_before = !first_delivery
            || self.messages.iter().any(|m| m.id == message.id)
            || self.replies.iter().any(|m| m.id == message.id);

        if let Some(state) = self.channels.iter_mut().find(|c| c.channel.cid == cid) {
            if !seen_before {
                state.apply_new_message(message.clone());
            } else if let Some(existing) = state.messages.iter_mut().find(|m| m.id == message.id) {
                *existing = message.clone();
            }
            sort_by_last_message(&mut self.channels);
            if let Some(highlighted) = highlighted {
                if let Some(index) = self.channels.iter().position(|c| c.channel.cid == highlighted) {
                    self.channel_index = index;
                }
            }
        }

        if self.selection.channel().map(|c| c.cid.as_str()) != Some(cid) {
            return;
        }

        match message.parent_id.clone() {
            None => {
                let at_bottom = self.message_index + 1 >= self.messages.len();
                upsert(&mut self.messages, message);
                if at_bottom && self.screen() == Some(Screen::Channel) {
                    self.message_index = self.messages.len().saturating_sub(1);
                }
            }
            Some(parent_id) => {
                if !seen_before {
                    if let Some(parent) = self.messages.iter_mut().find(|m| m.id == parent_id) {
                        parent.reply_count += 1;
                    }
                }
                if self.selection.thread().map(|t| t.message_id.as_str()) == Some(parent_id.as_str()) {
                    let at_bottom = self.reply_index + 1 >= self.replies.len();
                    upsert(&mut self.replies, message);
                    if at_bottom {
                        self.reply_index = self.replies.len().saturating_sub(1);
                    }
                }
            }
        }
    }

    /// Replace an edited or reacted-to message wherever it is shown.
    fn apply_updated_message(&mut self, message: Message) {
        replace(&mut self.messages, &message);
        replace(&mut self.replies, &message);
        for state in &mut self.channels {
            if replace(&mut state.messages, &message) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockChatBackend;
    use crate::app::tests::test_app;
    use crate::domain::{BackSource, NavEvent};
    use crate::error::BackendError;
    use crate::models::{ChannelRef, ChannelState, ConnectedUser, ThreadRef, UserRef};

    fn ready_app() -> App {
        let mut app = test_app(MockChatBackend::new());
        let ticket = app.session.begin_connect().unwrap();
        app.pending_connect = Some(ticket);
        app.handle_message(AppMessage::ConnectFinished(Ok(ConnectedUser::new(
            UserRef::new("ron"),
        ))));
        app
    }

    fn msg(id: &str, text: &str) -> Message {
        Message::new(id, text, UserRef::new("harry")).in_channel("messaging:general")
    }

    fn open_general(app: &mut App) {
        app.router.dispatch(
            NavEvent::ChannelSelected(ChannelRef::new("messaging", "general")),
            &mut app.selection,
        );
        app.handle_message(AppMessage::MessagesLoaded {
            cid: "messaging:general".to_string(),
            messages: vec![msg("m1", "one"), msg("m2", "two")],
        });
    }

    #[test]
    fn test_connect_failure_keeps_splash() {
        let mut app = test_app(MockChatBackend::new());
        let ticket = app.session.begin_connect().unwrap();
        app.pending_connect = Some(ticket);
        app.handle_message(AppMessage::ConnectFinished(Err(BackendError::Auth {
            message: "bad token".to_string(),
        })));

        assert!(!app.router.is_activated());
        assert!(app.session.failure().is_some());
        assert_eq!(app.screen(), None);
    }

    #[tokio::test]
    async fn test_message_new_appends_to_open_channel() {
        let mut app = ready_app();
        open_general(&mut app);
        assert_eq!(app.message_index, 1);

        app.handle_message(AppMessage::Backend(BackendEvent::MessageNew {
            cid: "messaging:general".to_string(),
            message: msg("m3", "three"),
        }));
        let ids: Vec<&str> = app.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(app.message_index, 2);

        // Echo of the same message does not duplicate it
        app.handle_message(AppMessage::MessageSent {
            cid: "messaging:general".to_string(),
            message: msg("m3", "three"),
        });
        assert_eq!(app.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_message_for_other_channel_only_updates_list() {
        let mut app = ready_app();
        app.handle_message(AppMessage::ChannelsLoaded(vec![
            ChannelState::new(ChannelRef::new("messaging", "general")),
            ChannelState::new(ChannelRef::new("messaging", "random")),
        ]));
        open_general(&mut app);

        app.handle_message(AppMessage::Backend(BackendEvent::MessageNew {
            cid: "messaging:random".to_string(),
            message: msg("r1", "elsewhere").in_channel("messaging:random"),
        }));
        assert_eq!(app.messages.len(), 2);
        // Most recent activity first
        assert_eq!(app.channels[0].channel.id, "random");
    }

    #[tokio::test]
    async fn test_reply_goes_to_open_thread_and_bumps_count() {
        let mut app = ready_app();
        open_general(&mut app);
        let root = app.messages[0].clone();
        app.router.dispatch(
            NavEvent::ThreadSelected(ThreadRef::from_message(&root, "messaging:general")),
            &mut app.selection,
        );
        app.handle_message(AppMessage::RepliesLoaded {
            message_id: "m1".to_string(),
            replies: vec![],
        });

        let reply = msg("r1", "a reply").reply_to("m1");
        app.handle_message(AppMessage::Backend(BackendEvent::MessageNew {
            cid: "messaging:general".to_string(),
            message: reply.clone(),
        }));
        app.handle_message(AppMessage::MessageSent {
            cid: "messaging:general".to_string(),
            message: reply,
        });

        assert_eq!(app.replies.len(), 1);
        assert_eq!(app.messages[0].reply_count, 1);
        assert_eq!(app.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_reply_echo_after_leaving_thread_counts_once() {
        let mut app = ready_app();
        app.handle_message(AppMessage::ChannelsLoaded(vec![ChannelState::new(
            ChannelRef::new("messaging", "general"),
        )
        .with_messages(vec![msg("m1", "one")])]));
        open_general(&mut app);
        let root = app.messages[0].clone();
        app.navigate(NavEvent::ThreadSelected(ThreadRef::from_message(
            &root,
            "messaging:general",
        )));
        app.handle_message(AppMessage::RepliesLoaded {
            message_id: "m1".to_string(),
            replies: vec![],
        });

        // Leave before the send result and echo come back
        app.navigate(NavEvent::Back(BackSource::Gesture));
        assert!(app.replies.is_empty());

        let reply = msg("r1", "a reply").reply_to("m1");
        app.handle_message(AppMessage::Backend(BackendEvent::MessageNew {
            cid: "messaging:general".to_string(),
            message: reply.clone(),
        }));
        app.handle_message(AppMessage::MessageSent {
            cid: "messaging:general".to_string(),
            message: reply,
        });

        assert_eq!(app.messages[0].reply_count, 1);
        assert_eq!(app.channels[0].messages[0].reply_count, 1);
    }

    #[tokio::test]
    async fn test_stale_messages_are_dropped() {
        let mut app = ready_app();
        open_general(&mut app);
        app.handle_message(AppMessage::MessagesLoaded {
            cid: "messaging:random".to_string(),
            messages: vec![msg("x", "stale")],
        });
        assert_eq!(app.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_reaction_updates_message() {
        let mut app = ready_app();
        open_general(&mut app);
        let mut updated = app.messages[1].clone();
        updated.add_reaction("like", "ron");

        app.handle_message(AppMessage::ReactionSent { message: updated });
        assert_eq!(app.messages[1].reaction_counts.get("like"), Some(&1));
    }

    #[tokio::test]
    async fn test_request_failure_sets_status() {
        let mut app = ready_app();
        app.handle_message(AppMessage::RequestFailed {
            operation: "load channels",
            error: BackendError::Api {
                status: 500,
                code: -1,
                message: "boom".to_string(),
            },
        });
        let status = app.status.as_ref().unwrap();
        assert!(status.is_error);
        assert!(status.text.starts_with("Could not load channels"));
        assert!(!app.loading_channels);
        // Failures after connect are not fatal
        assert!(app.session.is_ready());
    }
}
