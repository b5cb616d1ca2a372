//! Channel list query: filter, sort and watch options.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::UserRef;

/// Channel type used by the demo channels.
pub const MESSAGING_CHANNEL_TYPE: &str = "messaging";

/// Tag the demo channels carry in their custom `example` field.
pub const EXAMPLE_APP_TAG: &str = "example-apps";

/// Default page size for the channel list.
pub const CHANNEL_PAGE_LIMIT: u32 = 30;

/// Filter conditions for the channel list.
///
/// Serializes to the backend's filter language:
/// `{"example": "...", "members": {"$in": [...]}, "type": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFilter {
    /// Value of the custom `example` field, when filtered on
    pub example: Option<String>,
    /// Channels must include at least one of these members
    pub members_in: Vec<String>,
    /// Channel type
    pub kind: String,
}

impl ChannelFilter {
    /// Messaging channels tagged for the example app that `user` belongs to.
    pub fn member_of(user: &UserRef) -> Self {
        Self {
            example: Some(EXAMPLE_APP_TAG.to_string()),
            members_in: vec![user.id.clone()],
            kind: MESSAGING_CHANNEL_TYPE.to_string(),
        }
    }

    /// Evaluate the filter against a channel's type, members and `example`
    /// field.
    pub fn matches(&self, kind: &str, members: &[String], example: Option<&str>) -> bool {
        if kind != self.kind {
            return false;
        }
        if let Some(expected) = self.example.as_deref() {
            if example != Some(expected) {
                return false;
            }
        }
        self.members_in.is_empty() || self.members_in.iter().any(|m| members.contains(m))
    }
}

impl Serialize for ChannelFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct MembersIn<'a>(&'a [String]);

        impl Serialize for MembersIn<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$in", self.0)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(None)?;
        if let Some(example) = &self.example {
            map.serialize_entry("example", example)?;
        }
        if !self.members_in.is_empty() {
            map.serialize_entry("members", &MembersIn(&self.members_in))?;
        }
        map.serialize_entry("type", &self.kind)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_i8(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Sort descriptor for the channel list, serialized as `{field, direction}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSort {
    pub field: String,
    pub direction: SortDirection,
}

impl ChannelSort {
    /// Most recently active channels first.
    pub fn last_message_desc() -> Self {
        Self {
            field: "last_message_at".to_string(),
            direction: SortDirection::Descending,
        }
    }
}

impl Serialize for ChannelSort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ChannelSort", 2)?;
        s.serialize_field("field", &self.field)?;
        s.serialize_field("direction", &self.direction.as_i8())?;
        s.end()
    }
}

/// Watch/state options sent with the channel list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryOptions {
    pub presence: bool,
    pub state: bool,
    pub watch: bool,
    pub limit: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            presence: true,
            state: true,
            watch: true,
            limit: CHANNEL_PAGE_LIMIT,
        }
    }
}

/// Everything the channel list needs to ask the backend for channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelQuery {
    pub filter: ChannelFilter,
    pub sort: ChannelSort,
    pub options: QueryOptions,
}

impl ChannelQuery {
    /// The channel list query for `user`.
    pub fn for_user(user: &UserRef) -> Self {
        Self {
            filter: ChannelFilter::member_of(user),
            sort: ChannelSort::last_message_desc(),
            options: QueryOptions::default(),
        }
    }

    /// Request body for the channel query endpoint.
    pub fn to_request_body(&self) -> serde_json::Value {
        serde_json::json!({
            "filter_conditions": self.filter,
            "sort": [self.sort],
            "state": self.options.state,
            "watch": self.options.watch,
            "presence": self.options.presence,
            "limit": self.options.limit,
        })
    }
}
