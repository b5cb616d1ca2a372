use super::{Message, UserRef};

/// Reference to the root message of a reply thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    /// Id of the root message
    pub message_id: String,
    /// Channel the root message lives in
    pub cid: String,
    pub author: UserRef,
    /// Root message text, shown above the replies
    pub text: String,
    pub reply_count: u32,
}

impl ThreadRef {
    /// Build a thread reference rooted at `message` in channel `cid`.
    pub fn from_message(message: &Message, cid: impl Into<String>) -> Self {
        Self {
            message_id: message.id.clone(),
            cid: message.cid.clone().unwrap_or_else(|| cid.into()),
            author: message.user.clone(),
            text: message.text.clone(),
            reply_count: message.reply_count,
        }
    }

    /// Whether `message` is a reply belonging to this thread.
    pub fn contains(&self, message: &Message) -> bool {
        message.parent_id.as_deref() == Some(self.message_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_prefers_message_cid() {
        let message = Message::new("m1", "root", UserRef::new("ron"))
            .in_channel("messaging:general")
            .with_reply_count(4);
        let thread = ThreadRef::from_message(&message, "messaging:other");
        assert_eq!(thread.cid, "messaging:general");
        assert_eq!(thread.message_id, "m1");
        assert_eq!(thread.reply_count, 4);

        let bare = Message::new("m2", "root", UserRef::new("ron"));
        assert_eq!(
            ThreadRef::from_message(&bare, "messaging:other").cid,
            "messaging:other"
        );
    }

    #[test]
    fn test_contains_matches_parent() {
        let root = Message::new("m1", "root", UserRef::new("ron"));
        let thread = ThreadRef::from_message(&root, "messaging:general");
        let reply = Message::new("r1", "reply", UserRef::new("harry")).reply_to("m1");
        let other = Message::new("r2", "reply", UserRef::new("harry")).reply_to("m9");
        assert!(thread.contains(&reply));
        assert!(!thread.contains(&other));
        assert!(!thread.contains(&root));
    }
}
