//! Chat backend trait abstraction.
//!
//! The navigation core and the UI only ever talk to the hosted chat service
//! through [`ChatBackend`], so the production REST/websocket adapter and the
//! in-memory mock are interchangeable.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::BackendError;
use crate::models::{
    ChannelQuery, ChannelRef, ChannelState, ConnectedUser, Message, NewMessage, ThreadRef,
    UserRef, UserToken,
};

/// Real-time events pushed by the backend after connect.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// A message (or thread reply) was posted in a watched channel
    MessageNew { cid: String, message: Message },
    /// A message was edited
    MessageUpdated { cid: String, message: Message },
    /// A reaction was added; carries the updated message
    ReactionNew { cid: String, message: Message },
    /// The socket went up or down
    ConnectionChanged { online: bool },
}

impl BackendEvent {
    /// Channel the event belongs to, if any.
    pub fn cid(&self) -> Option<&str> {
        match self {
            BackendEvent::MessageNew { cid, .. }
            | BackendEvent::MessageUpdated { cid, .. }
            | BackendEvent::ReactionNew { cid, .. } => Some(cid),
            BackendEvent::ConnectionChanged { .. } => None,
        }
    }
}

/// Trait for chat backend operations.
///
/// # Example
///
/// ```ignore
/// use chatstack::traits::ChatBackend;
///
/// async fn first_channel<B: ChatBackend>(backend: &B, user: &UserRef) -> Option<ChannelRef> {
///     let query = ChannelQuery::for_user(user);
///     let channels = backend.query_channels(&query).await.ok()?;
///     channels.into_iter().next().map(|c| c.channel)
/// }
/// ```
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Open the connection for `user`. Must succeed before any other call.
    async fn connect_user(
        &self,
        user: &UserRef,
        token: &UserToken,
    ) -> Result<ConnectedUser, BackendError>;

    /// Close the connection. Safe to call when not connected.
    async fn disconnect_user(&self);

    /// Channels matching `query`, ordered as the query's sort asks.
    async fn query_channels(&self, query: &ChannelQuery) -> Result<Vec<ChannelState>, BackendError>;

    /// Most recent top-level messages of `channel`, oldest first.
    async fn channel_messages(
        &self,
        channel: &ChannelRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError>;

    /// Replies to the thread's root message, oldest first.
    async fn thread_replies(
        &self,
        thread: &ThreadRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError>;

    /// Post a message (or a reply when `message.parent_id` is set).
    async fn send_message(
        &self,
        channel: &ChannelRef,
        message: NewMessage,
    ) -> Result<Message, BackendError>;

    /// Add a reaction of `kind` to a message, returning the updated message.
    async fn send_reaction(&self, message_id: &str, kind: &str) -> Result<Message, BackendError>;

    /// Subscribe to real-time events. Every subscriber gets every event.
    fn subscribe(&self) -> broadcast::Receiver<BackendEvent>;
}
