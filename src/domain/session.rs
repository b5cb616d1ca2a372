//! Session lifecycle management.
//!
//! [`SessionManager`] owns the identity and credential for the one backend
//! connection a process makes. It sequences connect-before-render: nothing
//! backend-dependent is shown until [`SessionManager::is_ready`] flips to
//! true, and it flips exactly once.

use tracing::{error, info};

use crate::error::{BackendError, SessionError};
use crate::models::{ConnectedUser, UserRef, UserToken};
use crate::traits::ChatBackend;

/// Connection state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Proof that a connect attempt is in flight.
///
/// Only [`SessionManager::begin_connect`] creates one, and
/// [`SessionManager::complete`] consumes it.
#[derive(Debug)]
pub struct ConnectTicket {
    _private: (),
}

/// Returned once, when the session becomes ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ready {
    pub user: ConnectedUser,
}

#[derive(Debug)]
pub struct SessionManager {
    identity: UserRef,
    credential: UserToken,
    state: ConnectionState,
    /// Set by the first `begin_connect`; never reset
    started: bool,
    connected_user: Option<ConnectedUser>,
    /// Fatal connect failure, if the one attempt failed
    failure: Option<SessionError>,
}

impl SessionManager {
    pub fn new(identity: UserRef, credential: UserToken) -> Self {
        Self {
            identity,
            credential,
            state: ConnectionState::Disconnected,
            started: false,
            connected_user: None,
            failure: None,
        }
    }

    pub fn identity(&self) -> &UserRef {
        &self.identity
    }

    pub fn credential(&self) -> &UserToken {
        &self.credential
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Readiness gate for backend-dependent screens.
    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.state == ConnectionState::Connecting
    }

    pub fn failure(&self) -> Option<&SessionError> {
        self.failure.as_ref()
    }

    pub fn connected_user(&self) -> Option<&ConnectedUser> {
        self.connected_user.as_ref()
    }

    /// Start the single connect attempt: Disconnected → Connecting.
    ///
    /// Any later call fails with [`SessionError::AlreadyStarted`], including
    /// after a failed attempt.
    pub fn begin_connect(&mut self) -> Result<ConnectTicket, SessionError> {
        if self.started {
            return Err(SessionError::AlreadyStarted { state: self.state });
        }
        self.started = true;
        self.state = ConnectionState::Connecting;
        info!(user_id = %self.identity.id, "Connecting chat session");
        Ok(ConnectTicket { _private: () })
    }

    /// Finish the attempt started by `begin_connect`.
    ///
    /// Success moves to Connected. Failure is recorded as fatal and the
    /// session returns to Disconnected; there is no retry.
    pub fn complete(
        &mut self,
        ticket: ConnectTicket,
        result: Result<ConnectedUser, BackendError>,
    ) -> Result<Ready, SessionError> {
        let ConnectTicket { _private: () } = ticket;
        if self.state != ConnectionState::Connecting {
            return Err(SessionError::NotConnecting);
        }

        match result {
            Ok(user) => {
                info!(
                    user_id = %user.user.id,
                    connection_id = user.connection_id.as_deref().unwrap_or("-"),
                    "Chat session ready"
                );
                self.state = ConnectionState::Connected;
                self.connected_user = Some(user.clone());
                Ok(Ready { user })
            }
            Err(err) => {
                error!(error = %err, category = %err.category(), "Chat session connect failed");
                self.state = ConnectionState::Disconnected;
                let failure = SessionError::Connect(err);
                self.failure = Some(failure.clone());
                Err(failure)
            }
        }
    }

    /// Connect through `backend`: begin, call `connect_user`, complete.
    pub async fn connect<B>(&mut self, backend: &B) -> Result<Ready, SessionError>
    where
        B: ChatBackend + ?Sized,
    {
        let ticket = self.begin_connect()?;
        let result = backend
            .connect_user(&self.identity, &self.credential)
            .await;
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockChatBackend;

    fn session() -> SessionManager {
        SessionManager::new(UserRef::new("ron"), UserToken::new("USER_TOKEN"))
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let session = session();
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(!session.is_ready());
        assert!(session.failure().is_none());
    }

    #[test]
    fn test_begin_connect_only_once() {
        let mut session = session();
        let _ticket = session.begin_connect().unwrap();
        assert!(session.is_connecting());

        let err = session.begin_connect().unwrap_err();
        assert_eq!(
            err,
            SessionError::AlreadyStarted {
                state: ConnectionState::Connecting
            }
        );
    }

    #[test]
    fn test_complete_success_sets_ready() {
        let mut session = session();
        let ticket = session.begin_connect().unwrap();
        let ready = session
            .complete(ticket, Ok(ConnectedUser::new(UserRef::new("ron"))))
            .unwrap();

        assert_eq!(ready.user.user.id, "ron");
        assert!(session.is_ready());
        assert_eq!(session.connected_user().unwrap().user.id, "ron");
    }

    #[test]
    fn test_complete_failure_is_fatal() {
        let mut session = session();
        let ticket = session.begin_connect().unwrap();
        let err = session
            .complete(ticket, Err(BackendError::Closed))
            .unwrap_err();

        assert_eq!(err, SessionError::Connect(BackendError::Closed));
        assert!(!session.is_ready());
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.failure(), Some(&err));

        // No second attempt after a failure
        assert!(matches!(
            session.begin_connect(),
            Err(SessionError::AlreadyStarted { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_through_backend() {
        let backend = MockChatBackend::new();
        let mut session = session();

        let ready = session.connect(&backend).await.unwrap();
        assert_eq!(ready.user.user.id, "ron");
        assert!(session.is_ready());
        assert_eq!(backend.connect_calls(), 1);

        // Never re-invokes connect once ready
        assert!(session.connect(&backend).await.is_err());
        assert_eq!(backend.connect_calls(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_through_backend() {
        let backend = MockChatBackend::new();
        backend.fail_connect(BackendError::Auth {
            message: "invalid token".to_string(),
        });
        let mut session = session();

        let err = session.connect(&backend).await.unwrap_err();
        assert!(matches!(err, SessionError::Connect(BackendError::Auth { .. })));
        assert!(!session.is_ready());
    }
}
