//! Selected channel and thread shared by the three screens.
//!
//! The store is owned by the app and passed by reference; there is no global
//! instance. Each field has one writer: the channel list writes the channel,
//! the channel screen writes the thread, and the thread screen clears it when
//! it goes away. In practice all writes go through the router.

use crate::models::{ChannelRef, ThreadRef};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    channel: Option<ChannelRef>,
    thread: Option<ThreadRef>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected channel. There is no way to clear it.
    pub fn set_channel(&mut self, channel: ChannelRef) {
        self.channel = Some(channel);
    }

    pub fn channel(&self) -> Option<&ChannelRef> {
        self.channel.as_ref()
    }

    pub fn set_thread(&mut self, thread: Option<ThreadRef>) {
        self.thread = thread;
    }

    pub fn thread(&self) -> Option<&ThreadRef> {
        self.thread.as_ref()
    }

    pub fn clear_thread(&mut self) {
        self.thread = None;
    }

    /// True when the selected channel can host a thread.
    pub fn has_navigable_channel(&self) -> bool {
        self.channel.as_ref().is_some_and(ChannelRef::has_id)
    }
}
