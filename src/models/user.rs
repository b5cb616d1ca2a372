use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat user as the backend knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name to show in the UI, falling back to the id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// User token handed to the backend when connecting.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserToken(<{} chars>)", self.0.len())
    }
}

/// Outcome of a successful connect handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedUser {
    /// The user as echoed back by the backend
    pub user: UserRef,
    /// Connection id used to watch channels over the socket
    pub connection_id: Option<String>,
}

impl ConnectedUser {
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            connection_id: None,
        }
    }

    pub fn with_connection_id(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = Some(connection_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(UserRef::new("ron").display_name(), "ron");
        assert_eq!(
            UserRef::new("ron").with_name("Ron Weasley").display_name(),
            "Ron Weasley"
        );
        assert_eq!(UserRef::new("ron").with_name("").display_name(), "ron");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = UserToken::new("secret-jwt");
        let printed = format!("{:?}", token);
        assert!(!printed.contains("secret"));
        assert_eq!(printed, "UserToken(<10 chars>)");
    }

    #[test]
    fn test_user_deserializes_without_name() {
        let user: UserRef = serde_json::from_str(r#"{"id":"ron","online":true}"#).unwrap();
        assert_eq!(user, UserRef::new("ron"));
    }
}
