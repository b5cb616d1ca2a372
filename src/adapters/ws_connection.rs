//! Websocket half of the hosted chat backend.
//!
//! The socket carries the connect handshake and the real-time event feed.
//! Everything else goes over REST (see `rest_backend`).

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::rest_backend::ApiErrorBody;
use crate::error::BackendError;
use crate::models::{ConnectedUser, Message, UserRef, UserToken};
use crate::traits::BackendEvent;

/// Interval between client `health.check` frames.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(25);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsRead = SplitStream<WsStream>;

/// Any frame the server sends. Fields absent from a given event type stay `None`.
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    connection_id: Option<String>,
    #[serde(default)]
    me: Option<UserRef>,
    #[serde(default)]
    cid: Option<String>,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

/// Build the `/connect` URL for `user`.
///
/// Credentials travel as query parameters on the upgrade request.
pub fn connect_url(ws_url: &str, api_key: &str, user: &UserRef, token: &UserToken) -> String {
    let payload = serde_json::json!({
        "user_id": user.id,
        "user_details": user,
        "server_determines_connection_id": true,
    });
    format!(
        "{}/connect?json={}&api_key={}&authorization={}&stream-auth-type=jwt",
        ws_url.trim_end_matches('/'),
        urlencoding::encode(&payload.to_string()),
        urlencoding::encode(api_key),
        urlencoding::encode(token.as_str()),
    )
}

/// Interpret the first text frame after the upgrade.
fn read_handshake(text: &str, user: &UserRef) -> Result<ConnectedUser, BackendError> {
    let frame: Frame = serde_json::from_str(text)?;

    if let Some(err) = frame.error {
        return Err(BackendError::Auth {
            message: err.message,
        });
    }
    if frame.kind == "connection.error" {
        return Err(BackendError::Auth {
            message: "connection rejected".to_string(),
        });
    }
    if frame.kind != "health.check" {
        return Err(BackendError::InvalidResponse(format!(
            "expected health.check, got '{}'",
            frame.kind
        )));
    }

    let connection_id = frame.connection_id.ok_or_else(|| {
        BackendError::InvalidResponse("health.check without connection_id".to_string())
    })?;
    let me = frame.me.unwrap_or_else(|| user.clone());
    Ok(ConnectedUser::new(me).with_connection_id(connection_id))
}

/// Decode an event frame. Unknown or malformed frames yield `None`.
pub fn decode_event(text: &str) -> Option<BackendEvent> {
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to parse socket frame: {}", e);
            return None;
        }
    };

    let Frame {
        kind, cid, message, ..
    } = frame;
    let (cid, message) = match (cid, message) {
        (Some(cid), Some(mut message)) => {
            if message.cid.is_none() {
                message.cid = Some(cid.clone());
            }
            (cid, message)
        }
        _ => return None,
    };

    match kind.as_str() {
        "message.new" => Some(BackendEvent::MessageNew { cid, message }),
        "message.updated" => Some(BackendEvent::MessageUpdated { cid, message }),
        "reaction.new" => Some(BackendEvent::ReactionNew { cid, message }),
        _ => None,
    }
}

fn classify_ws_error(err: tungstenite::Error, endpoint: &str) -> BackendError {
    match err {
        tungstenite::Error::Http(response) => {
            let status = response.status().as_u16();
            let body: Option<ApiErrorBody> = response
                .body()
                .as_deref()
                .and_then(|body| serde_json::from_slice(body).ok());
            let message = body
                .as_ref()
                .map(|b| b.message.clone())
                .unwrap_or_else(|| format!("upgrade rejected with status {}", status));
            if status == 401 || status == 403 {
                BackendError::Auth { message }
            } else {
                BackendError::Api {
                    status,
                    code: body.map(|b| b.code).unwrap_or_default(),
                    message,
                }
            }
        }
        other => BackendError::ConnectionFailed {
            url: endpoint.to_string(),
            message: other.to_string(),
        },
    }
}

async fn handshake(
    url: &str,
    endpoint: &str,
    user: &UserRef,
) -> Result<(WsSink, WsRead, ConnectedUser), BackendError> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(|e| classify_ws_error(e, endpoint))?;
    let (mut sink, mut read) = stream.split();

    loop {
        match read.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                let connected = read_handshake(&text, user)?;
                return Ok((sink, read, connected));
            }
            Some(Ok(WsMessage::Ping(data))) => {
                let _ = sink.send(WsMessage::Pong(data)).await;
            }
            Some(Ok(WsMessage::Close(_))) | None => return Err(BackendError::Closed),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(classify_ws_error(e, endpoint)),
        }
    }
}

/// A live socket. Dropping it closes the connection.
#[derive(Debug)]
pub struct WsConnection {
    connection_id: String,
    shutdown: watch::Sender<bool>,
}

impl WsConnection {
    /// Open the socket at `url`, wait for the handshake and start the reader task.
    ///
    /// `endpoint` is the credential-free URL used in error messages.
    pub async fn open(
        url: &str,
        endpoint: &str,
        user: &UserRef,
        timeout: Duration,
        events: broadcast::Sender<BackendEvent>,
    ) -> Result<(Self, ConnectedUser), BackendError> {
        let (sink, read, connected) = tokio::time::timeout(timeout, handshake(url, endpoint, user))
            .await
            .map_err(|_| BackendError::Timeout {
                operation: "connect".to_string(),
                secs: timeout.as_secs(),
            })??;

        let connection_id = connected.connection_id.clone().unwrap_or_default();
        info!(connection_id = %connection_id, "Socket connected to {}", endpoint);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let _ = events.send(BackendEvent::ConnectionChanged { online: true });
        tokio::spawn(run_socket(
            sink,
            read,
            connection_id.clone(),
            events,
            shutdown_rx,
        ));

        Ok((
            Self {
                connection_id,
                shutdown,
            },
            connected,
        ))
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Ask the reader task to send a close frame and stop.
    pub fn close(&self) {
        debug!(connection_id = %self.connection_id, "Closing socket");
        let _ = self.shutdown.send(true);
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reader/keepalive loop. Runs until the server closes, an error occurs or
/// `shutdown` fires. There is no reconnect.
async fn run_socket(
    mut sink: WsSink,
    mut read: WsRead,
    connection_id: String,
    events: broadcast::Sender<BackendEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
    // First tick fires immediately; the handshake just proved liveness.
    keepalive.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.close().await;
                break;
            }
            _ = keepalive.tick() => {
                let frame = serde_json::json!([{
                    "type": "health.check",
                    "client_id": connection_id,
                }]);
                if let Err(e) = sink.send(WsMessage::Text(frame.to_string())).await {
                    error!("Failed to send keepalive: {}", e);
                    break;
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Some(event) = decode_event(&text) {
                            debug!(cid = event.cid().unwrap_or("-"), "Socket event");
                            // No subscribers is fine
                            let _ = events.send(event);
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sink.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        info!("Socket closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    let _ = events.send(BackendEvent::ConnectionChanged { online: false });
    info!("Socket loop ended");
}
