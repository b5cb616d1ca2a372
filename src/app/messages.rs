//! AppMessage enum for async communication within the application.

use crate::error::BackendError;
use crate::models::{ChannelState, ConnectedUser, Message};
use crate::traits::BackendEvent;

/// Messages received from spawned backend tasks
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// The single connect attempt finished
    ConnectFinished(Result<ConnectedUser, BackendError>),
    /// Channel list query returned
    ChannelsLoaded(Vec<ChannelState>),
    /// Messages for a channel returned
    MessagesLoaded { cid: String, messages: Vec<Message> },
    /// Replies for a thread returned
    RepliesLoaded {
        message_id: String,
        replies: Vec<Message>,
    },
    /// A message (or reply) was accepted by the backend
    MessageSent { cid: String, message: Message },
    /// A reaction was accepted; carries the updated message
    ReactionSent { message: Message },
    /// Real-time event forwarded from the backend
    Backend(BackendEvent),
    /// A backend call failed; shown on the status line
    RequestFailed {
        operation: &'static str,
        error: BackendError,
    },
}
