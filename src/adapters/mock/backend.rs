//! In-memory chat backend.
//!
//! Holds channels, messages and replies in memory, evaluates channel filters
//! locally and echoes posted messages and reactions as [`BackendEvent`]s the
//! way the hosted service does over its socket. Tests use it to script
//! backend behaviour; `--demo` runs the TUI against [`MockChatBackend::demo`].

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use crate::error::BackendError;
use crate::models::{
    sort_by_last_message, ChannelQuery, ChannelRef, ChannelState, ConnectedUser, Message,
    NewMessage, SortDirection, ThreadRef, UserRef, UserToken,
};
use crate::models::query::EXAMPLE_APP_TAG;
use crate::traits::{BackendEvent, ChatBackend};

/// A channel plus the data the filter is evaluated against.
#[derive(Debug, Clone)]
pub struct MockChannel {
    pub state: ChannelState,
    pub members: Vec<String>,
    /// Custom `example` field
    pub example: Option<String>,
}

impl MockChannel {
    /// A messaging channel tagged for the example app.
    pub fn new(channel: ChannelRef, members: &[&str]) -> Self {
        let member_count = members.len() as u32;
        Self {
            state: ChannelState::new(channel.with_member_count(member_count)),
            members: members.iter().map(|m| m.to_string()).collect(),
            example: Some(EXAMPLE_APP_TAG.to_string()),
        }
    }

    pub fn without_example_tag(mut self) -> Self {
        self.example = None;
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        let cid = self.state.channel.cid.clone();
        self.state.apply_new_message(message.in_channel(cid));
        self
    }
}

/// A call recorded for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Connect { user_id: String },
    Disconnect,
    QueryChannels { members_in: Vec<String> },
    ChannelMessages { cid: String },
    ThreadReplies { message_id: String },
    SendMessage { cid: String, text: String, parent_id: Option<String> },
    SendReaction { message_id: String, kind: String },
}

#[derive(Debug, Default)]
struct MockState {
    channels: Vec<MockChannel>,
    /// Replies keyed by root message id
    replies: HashMap<String, Vec<Message>>,
    connected: Option<UserRef>,
    connect_error: Option<BackendError>,
    query_error: Option<BackendError>,
    calls: Vec<RecordedCall>,
}

/// In-memory [`ChatBackend`].
///
/// # Example
///
/// ```ignore
/// use chatstack::adapters::mock::{MockChatBackend, MockChannel};
///
/// let backend = MockChatBackend::new();
/// backend.add_channel(MockChannel::new(ChannelRef::new("messaging", "general"), &["ron"]));
/// backend.fail_connect(BackendError::Auth { message: "bad token".into() });
/// ```
#[derive(Debug, Clone)]
pub struct MockChatBackend {
    state: Arc<Mutex<MockState>>,
    events: broadcast::Sender<BackendEvent>,
}

impl Default for MockChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatBackend {
    /// An empty backend that accepts any credentials.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            events,
        }
    }

    /// A backend seeded with a few channels for `ron`.
    pub fn demo() -> Self {
        let backend = Self::new();
        let now = Utc::now();
        let ron = UserRef::new("ron").with_name("Ron");
        let harry = UserRef::new("harry").with_name("Harry");
        let hermione = UserRef::new("hermione").with_name("Hermione");

        let general = MockChannel::new(
            ChannelRef::new("messaging", "general").with_name("General"),
            &["ron", "harry", "hermione"],
        )
        .with_message(
            Message::new("general-1", "Anyone up for a game of chess?", ron.clone())
                .at(now - Duration::minutes(42)),
        )
        .with_message(
            Message::new("general-2", "Only if you promise not to gloat", harry.clone())
                .at(now - Duration::minutes(40))
                .with_reply_count(2),
        )
        .with_message(
            Message::new("general-3", "Has anyone seen my notes?", hermione.clone())
                .at(now - Duration::minutes(5)),
        );

        let quidditch = MockChannel::new(
            ChannelRef::new("messaging", "quidditch").with_name("Quidditch Team"),
            &["ron", "harry"],
        )
        .with_message(
            Message::new("quidditch-1", "Practice moved to 6", harry.clone())
                .at(now - Duration::hours(3)),
        );

        let unnamed = MockChannel::new(ChannelRef::new("messaging", "ron-hermione"), &[
            "ron", "hermione",
        ])
        .with_message(
            Message::new("dm-1", "Did you finish the essay?", hermione.clone())
                .at(now - Duration::hours(26)),
        );

        let other = MockChannel::new(
            ChannelRef::new("messaging", "slytherin").with_name("Slytherin Common Room"),
            &["draco"],
        );

        backend.add_channel(general);
        backend.add_channel(quidditch);
        backend.add_channel(unnamed);
        backend.add_channel(other);

        backend.add_reply(
            "general-2",
            Message::new("general-2-r1", "No promises", ron.clone())
                .at(now - Duration::minutes(39))
                .in_channel("messaging:general"),
        );
        backend.add_reply(
            "general-2",
            Message::new("general-2-r2", "Then I'm out", harry)
                .at(now - Duration::minutes(38))
                .in_channel("messaging:general"),
        );

        backend
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_channel(&self, channel: MockChannel) {
        self.state().channels.push(channel);
    }

    /// Seed a reply without bumping the root's reply count.
    pub fn add_reply(&self, parent_id: &str, reply: Message) {
        self.state()
            .replies
            .entry(parent_id.to_string())
            .or_default()
            .push(reply.reply_to(parent_id));
    }

    /// Make `connect_user` fail with `err`.
    pub fn fail_connect(&self, err: BackendError) {
        self.state().connect_error = Some(err);
    }

    /// Make `query_channels` fail with `err` (or succeed again with `None`).
    pub fn set_query_error(&self, err: Option<BackendError>) {
        self.state().query_error = err;
    }

    /// Push a real-time event to subscribers.
    pub fn emit(&self, event: BackendEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Connect { .. }))
            .count()
    }

    /// Current top-level messages of `cid`, without recording a call.
    pub fn messages_in(&self, cid: &str) -> Vec<Message> {
        self.state()
            .channels
            .iter()
            .find(|c| c.state.channel.cid == cid)
            .map(|c| c.state.messages.clone())
            .unwrap_or_default()
    }

    pub fn is_connected(&self) -> bool {
        self.state().connected.is_some()
    }

    fn record(&self, call: RecordedCall) {
        self.state().calls.push(call);
    }

    fn connected_user(&self) -> Result<UserRef, BackendError> {
        self.state().connected.clone().ok_or(BackendError::NotConnected)
    }

    fn not_found(what: &str, id: &str) -> BackendError {
        BackendError::Api {
            status: 404,
            code: 16,
            message: format!("{} {} does not exist", what, id),
        }
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn connect_user(
        &self,
        user: &UserRef,
        token: &UserToken,
    ) -> Result<ConnectedUser, BackendError> {
        self.record(RecordedCall::Connect {
            user_id: user.id.clone(),
        });
        let mut state = self.state();
        if let Some(err) = state.connect_error.clone() {
            return Err(err);
        }
        if token.is_empty() {
            return Err(BackendError::Auth {
                message: "user token is empty".to_string(),
            });
        }
        state.connected = Some(user.clone());
        drop(state);
        let _ = self.events.send(BackendEvent::ConnectionChanged { online: true });
        Ok(ConnectedUser::new(user.clone()).with_connection_id(format!("mock-{}", user.id)))
    }

    async fn disconnect_user(&self) {
        self.record(RecordedCall::Disconnect);
        self.state().connected = None;
    }

    async fn query_channels(&self, query: &ChannelQuery) -> Result<Vec<ChannelState>, BackendError> {
        self.record(RecordedCall::QueryChannels {
            members_in: query.filter.members_in.clone(),
        });
        self.connected_user()?;
        let state = self.state();
        if let Some(err) = state.query_error.clone() {
            return Err(err);
        }

        let mut channels: Vec<ChannelState> = state
            .channels
            .iter()
            .filter(|c| {
                query
                    .filter
                    .matches(&c.state.channel.kind, &c.members, c.example.as_deref())
            })
            .map(|c| c.state.clone())
            .collect();
        drop(state);

        sort_by_last_message(&mut channels);
        if query.sort.direction == SortDirection::Ascending {
            channels.reverse();
        }
        channels.truncate(query.options.limit as usize);
        Ok(channels)
    }

    async fn channel_messages(
        &self,
        channel: &ChannelRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(RecordedCall::ChannelMessages {
            cid: channel.cid.clone(),
        });
        self.connected_user()?;
        let state = self.state();
        let found = state
            .channels
            .iter()
            .find(|c| c.state.channel.cid == channel.cid)
            .ok_or_else(|| Self::not_found("channel", &channel.cid))?;
        let messages = &found.state.messages;
        let skip = messages.len().saturating_sub(limit as usize);
        Ok(messages[skip..].to_vec())
    }

    async fn thread_replies(
        &self,
        thread: &ThreadRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(RecordedCall::ThreadReplies {
            message_id: thread.message_id.clone(),
        });
        self.connected_user()?;
        let state = self.state();
        let replies = state
            .replies
            .get(&thread.message_id)
            .cloned()
            .unwrap_or_default();
        let skip = replies.len().saturating_sub(limit as usize);
        Ok(replies[skip..].to_vec())
    }

    async fn send_message(
        &self,
        channel: &ChannelRef,
        message: NewMessage,
    ) -> Result<Message, BackendError> {
        self.record(RecordedCall::SendMessage {
            cid: channel.cid.clone(),
            text: message.text.clone(),
            parent_id: message.parent_id.clone(),
        });
        let user = self.connected_user()?;

        let mut posted = Message::new(message.id, message.text, user).in_channel(&channel.cid);
        posted.parent_id = message.parent_id;

        let mut state = self.state();
        let target = state
            .channels
            .iter_mut()
            .find(|c| c.state.channel.cid == channel.cid)
            .ok_or_else(|| Self::not_found("channel", &channel.cid))?;
        target.state.apply_new_message(posted.clone());
        if let Some(parent_id) = posted.parent_id.clone() {
            state.replies.entry(parent_id).or_default().push(posted.clone());
        }
        drop(state);

        let _ = self.events.send(BackendEvent::MessageNew {
            cid: channel.cid.clone(),
            message: posted.clone(),
        });
        Ok(posted)
    }

    async fn send_reaction(&self, message_id: &str, kind: &str) -> Result<Message, BackendError> {
        self.record(RecordedCall::SendReaction {
            message_id: message_id.to_string(),
            kind: kind.to_string(),
        });
        let user = self.connected_user()?;

        let mut state = self.state();
        let MockState {
            channels, replies, ..
        } = &mut *state;
        let top_level = channels.iter_mut().find_map(|c| {
            let cid = c.state.channel.cid.clone();
            c.state
                .messages
                .iter_mut()
                .find(|m| m.id == message_id)
                .map(|m| (cid, m))
        });
        let updated = match top_level {
            Some((cid, message)) => {
                message.add_reaction(kind, &user.id);
                Some((cid, message.clone()))
            }
            None => replies
                .values_mut()
                .flat_map(|r| r.iter_mut())
                .find(|m| m.id == message_id)
                .map(|message| {
                    message.add_reaction(kind, &user.id);
                    (message.cid.clone().unwrap_or_default(), message.clone())
                }),
        };
        drop(state);

        let (cid, message) = updated.ok_or_else(|| Self::not_found("message", message_id))?;
        let _ = self.events.send(BackendEvent::ReactionNew {
            cid,
            message: message.clone(),
        });
        Ok(message)
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}
