//! Hosted chat service adapter.
//!
//! Implements [`ChatBackend`] with reqwest for the REST calls and
//! [`WsConnection`] for the connect handshake and real-time events.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::ws_connection::{connect_url, WsConnection};
use crate::error::{classify_reqwest_error, BackendError};
use crate::models::{
    ChannelQuery, ChannelRef, ChannelState, ConnectedUser, Message, NewMessage, ThreadRef,
    UserRef, UserToken,
};
use crate::traits::{BackendEvent, ChatBackend};

/// Value of the `X-Stream-Client` header.
pub const CLIENT_HEADER: &str = concat!("chatstack-", env!("CARGO_PKG_VERSION"));

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Where and how to reach the hosted service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub ws_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    channels: Vec<ChannelState>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: Message,
}

/// Credentials for the live connection.
#[derive(Debug)]
struct LiveSession {
    token: UserToken,
    socket: WsConnection,
}

/// [`ChatBackend`] for the hosted service.
///
/// # Example
///
/// ```ignore
/// let backend = RestChatBackend::new(settings)?;
/// let me = backend.connect_user(&UserRef::new("ron"), &token).await?;
/// let channels = backend.query_channels(&ChannelQuery::for_user(&me.user)).await?;
/// ```
#[derive(Debug)]
pub struct RestChatBackend {
    client: reqwest::Client,
    settings: BackendSettings,
    events: broadcast::Sender<BackendEvent>,
    session: Mutex<Option<LiveSession>>,
}

impl RestChatBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| BackendError::ConnectionFailed {
                url: settings.base_url.clone(),
                message: e.to_string(),
            })?;
        let (events, _) = broadcast::channel(100);
        Ok(Self {
            client,
            settings,
            events,
            session: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    fn session(&self) -> MutexGuard<'_, Option<LiveSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token and connection id for the current connection.
    fn credentials(&self) -> Result<(UserToken, String), BackendError> {
        self.session()
            .as_ref()
            .map(|s| (s.token.clone(), s.socket.connection_id().to_string()))
            .ok_or(BackendError::NotConnected)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, BackendError> {
        let (token, connection_id) = self.credentials()?;
        let url = self.url(path);
        let timeout_secs = self.settings.connect_timeout.as_secs();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("connection_id", connection_id.as_str()),
            ])
            .query(query)
            .header("Authorization", token.as_str())
            .header("stream-auth-type", "jwt")
            .header("X-Stream-Client", CLIENT_HEADER);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        debug!("{} {}", method, path);
        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url, timeout_secs))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url, timeout_secs))?;

        if !status.is_success() {
            let err = api_error(status.as_u16(), &bytes);
            warn!(status = status.as_u16(), "{} {} failed: {}", method, path, err);
            return Err(err);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn api_error(status: u16, body: &[u8]) -> BackendError {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => BackendError::Api {
            status,
            code: parsed.code,
            message: parsed.message,
        },
        _ => BackendError::Api {
            status,
            code: 0,
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

fn channel_path(channel: &ChannelRef, suffix: &str) -> String {
    format!(
        "/channels/{}/{}/{}",
        urlencoding::encode(&channel.kind),
        urlencoding::encode(&channel.id),
        suffix
    )
}

fn with_cid(mut message: Message, cid: &str) -> Message {
    if message.cid.is_none() {
        message.cid = Some(cid.to_string());
    }
    message
}

#[async_trait]
impl ChatBackend for RestChatBackend {
    async fn connect_user(
        &self,
        user: &UserRef,
        token: &UserToken,
    ) -> Result<ConnectedUser, BackendError> {
        if token.is_empty() {
            return Err(BackendError::Auth {
                message: "user token is empty".to_string(),
            });
        }

        let url = connect_url(&self.settings.ws_url, &self.settings.api_key, user, token);
        let endpoint = format!("{}/connect", self.settings.ws_url.trim_end_matches('/'));
        let (socket, connected) = WsConnection::open(
            &url,
            &endpoint,
            user,
            self.settings.connect_timeout,
            self.events.clone(),
        )
        .await?;

        info!(user_id = %user.id, "Connected to {}", self.settings.base_url);
        let previous = self.session().replace(LiveSession {
            token: token.clone(),
            socket,
        });
        if let Some(previous) = previous {
            previous.socket.close();
        }
        Ok(connected)
    }

    async fn disconnect_user(&self) {
        if let Some(session) = self.session().take() {
            info!(connection_id = %session.socket.connection_id(), "Disconnecting");
            session.socket.close();
        }
    }

    async fn query_channels(&self, query: &ChannelQuery) -> Result<Vec<ChannelState>, BackendError> {
        let response: ChannelsResponse = self
            .request(Method::POST, "/channels", &[], Some(query.to_request_body()))
            .await?;

        Ok(response
            .channels
            .into_iter()
            .map(|state| {
                let channel = state.channel.normalized();
                let cid = channel.cid.clone();
                let messages = state
                    .messages
                    .into_iter()
                    .map(|m| with_cid(m, &cid))
                    .collect();
                ChannelState::new(channel).with_messages(messages)
            })
            .collect())
    }

    async fn channel_messages(
        &self,
        channel: &ChannelRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError> {
        let body = json!({
            "state": true,
            "watch": true,
            "messages": { "limit": limit },
        });
        let response: ChannelState = self
            .request(Method::POST, &channel_path(channel, "query"), &[], Some(body))
            .await?;
        Ok(response
            .messages
            .into_iter()
            .map(|m| with_cid(m, &channel.cid))
            .collect())
    }

    async fn thread_replies(
        &self,
        thread: &ThreadRef,
        limit: u32,
    ) -> Result<Vec<Message>, BackendError> {
        let path = format!(
            "/messages/{}/replies",
            urlencoding::encode(&thread.message_id)
        );
        let response: MessagesResponse = self
            .request(Method::GET, &path, &[("limit", limit.to_string())], None)
            .await?;
        Ok(response
            .messages
            .into_iter()
            .map(|m| with_cid(m, &thread.cid))
            .collect())
    }

    async fn send_message(
        &self,
        channel: &ChannelRef,
        message: NewMessage,
    ) -> Result<Message, BackendError> {
        let body = json!({ "message": message });
        let response: MessageResponse = self
            .request(Method::POST, &channel_path(channel, "message"), &[], Some(body))
            .await?;
        Ok(with_cid(response.message, &channel.cid))
    }

    async fn send_reaction(&self, message_id: &str, kind: &str) -> Result<Message, BackendError> {
        let path = format!("/messages/{}/reaction", urlencoding::encode(message_id));
        let body = json!({ "reaction": { "type": kind } });
        let response: MessageResponse = self.request(Method::POST, &path, &[], Some(body)).await?;
        Ok(response.message)
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}
