use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{ReactionSet, UserRef};

/// A reaction the current user has placed on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnReaction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A chat message as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: UserRef,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Channel this message belongs to, when the payload carries it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// Root message id when this is a thread reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub reaction_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub own_reactions: Vec<OwnReaction>,
}

impl Message {
    pub fn new(id: impl Into<String>, text: impl Into<String>, user: UserRef) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            user,
            created_at: Utc::now(),
            cid: None,
            parent_id: None,
            reply_count: 0,
            reaction_counts: BTreeMap::new(),
            own_reactions: Vec::new(),
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn in_channel(mut self, cid: impl Into<String>) -> Self {
        self.cid = Some(cid.into());
        self
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_reply_count(mut self, count: u32) -> Self {
        self.reply_count = count;
        self
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn has_thread(&self) -> bool {
        self.reply_count > 0
    }

    pub fn has_own_reaction(&self, kind: &str) -> bool {
        self.own_reactions.iter().any(|r| r.kind == kind)
    }

    /// Count a reaction placed by `user_id`.
    pub fn add_reaction(&mut self, kind: &str, user_id: &str) {
        *self.reaction_counts.entry(kind.to_string()).or_insert(0) += 1;
        self.own_reactions.push(OwnReaction {
            kind: kind.to_string(),
            user_id: Some(user_id.to_string()),
        });
    }

    /// Reactions rendered as `(glyph, count)`, supported reactions first in
    /// their configured order, unknown kinds after by name.
    pub fn reaction_summary(&self, reactions: &ReactionSet) -> Vec<(String, u32)> {
        let mut summary: Vec<(String, u32)> = reactions
            .iter()
            .filter_map(|r| {
                self.reaction_counts
                    .get(r.kind)
                    .filter(|count| **count > 0)
                    .map(|count| (r.glyph.to_string(), *count))
            })
            .collect();

        summary.extend(
            self.reaction_counts
                .iter()
                .filter(|(kind, count)| **count > 0 && reactions.by_kind(kind).is_none())
                .map(|(kind, count)| (kind.clone(), *count)),
        );
        summary
    }
}

/// An outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    /// Client-generated id so the echo from the socket can be matched
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl NewMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            parent_id: None,
        }
    }

    pub fn reply(text: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::text(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SUPPORTED_REACTIONS;

    #[test]
    fn test_deserialize_backend_message() {
        let json = r#"{
            "id": "m-1",
            "text": "hello",
            "type": "regular",
            "user": {"id": "ron", "name": "Ron"},
            "created_at": "2024-05-01T12:00:00.000000Z",
            "reply_count": 2,
            "reaction_counts": {"like": 3},
            "own_reactions": [{"type": "like", "user_id": "ron"}]
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "m-1");
        assert_eq!(message.user.display_name(), "Ron");
        assert!(message.has_thread());
        assert!(!message.is_reply());
        assert!(message.has_own_reaction("like"));
        assert_eq!(message.reaction_counts.get("like"), Some(&3));
    }

    #[test]
    fn test_reaction_summary_orders_supported_first() {
        let mut message = Message::new("m", "t", UserRef::new("ron"));
        message.reaction_counts.insert("love".to_string(), 1);
        message.reaction_counts.insert("duck".to_string(), 2);
        message.reaction_counts.insert("like".to_string(), 5);
        message.reaction_counts.insert("snowboarder".to_string(), 0);

        let summary = message.reaction_summary(&SUPPORTED_REACTIONS);
        assert_eq!(
            summary,
            vec![
                ("👍🏽".to_string(), 5),
                ("🦆".to_string(), 2),
                ("love".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_add_reaction() {
        let mut message = Message::new("m", "t", UserRef::new("ron"));
        message.add_reaction("duck", "ron");
        message.add_reaction("duck", "harry");
        assert_eq!(message.reaction_counts.get("duck"), Some(&2));
        assert!(message.has_own_reaction("duck"));
    }

    #[test]
    fn test_new_message_serialization() {
        let reply = NewMessage::reply("on it", "root-1");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["text"], "on it");
        assert_eq!(json["parent_id"], "root-1");
        assert!(!reply.id.is_empty());

        let top = serde_json::to_value(NewMessage::text("hi")).unwrap();
        assert!(top.get("parent_id").is_none());
    }
}
