use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// Reference to a channel owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    /// Fully qualified id, `type:id`
    #[serde(default)]
    pub cid: String,
    #[serde(default)]
    pub id: String,
    /// Channel type, e.g. "messaging"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub member_count: u32,
}

impl ChannelRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        let kind = kind.into();
        let id = id.into();
        Self {
            cid: format!("{}:{}", kind, id),
            id,
            kind,
            name: None,
            last_message_at: None,
            member_count: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_last_message_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_message_at = Some(at);
        self
    }

    pub fn with_member_count(mut self, count: u32) -> Self {
        self.member_count = count;
        self
    }

    /// Fill in `cid` (or split it into `kind`/`id`) when the payload only
    /// carried one side.
    pub fn normalized(mut self) -> Self {
        if self.cid.is_empty() && !self.id.is_empty() {
            self.cid = format!("{}:{}", self.kind, self.id);
        } else if self.id.is_empty() {
            if let Some((kind, id)) = self.cid.split_once(':') {
                self.kind = kind.to_string();
                self.id = id.to_string();
            }
        }
        self
    }

    /// A channel reference is only usable for navigation with an id.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Title for the channel screen header. `None` renders as blank.
    pub fn header_title(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Label for list rows: the name, or the id when the channel is unnamed.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// A channel plus the recent messages the backend returned with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    pub channel: ChannelRef,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChannelState {
    pub fn new(channel: ChannelRef) -> Self {
        Self {
            channel,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Latest top-level message, used as the list preview.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| !m.is_reply())
    }

    /// Record a message delivered by the backend for this channel.
    ///
    /// Replies bump the parent's reply count instead of joining the
    /// top-level list.
    pub fn apply_new_message(&mut self, message: Message) {
        let at = message.created_at;
        if self
            .channel
            .last_message_at
            .map_or(true, |current| at > current)
        {
            self.channel.last_message_at = Some(at);
        }

        if let Some(parent_id) = message.parent_id.as_deref() {
            if let Some(parent) = self.messages.iter_mut().find(|m| m.id == parent_id) {
                parent.reply_count += 1;
            }
            return;
        }

        if let Some(existing) = self.messages.iter_mut().find(|m| m.id == message.id) {
            *existing = message;
        } else {
            self.messages.push(message);
        }
    }
}

/// Sort channel states newest activity first; channels without messages go last.
pub fn sort_by_last_message(channels: &mut [ChannelState]) {
    channels.sort_by(|a, b| b.channel.last_message_at.cmp(&a.channel.last_message_at));
}
