//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//!
//! let backend = MockChatBackend::demo();
//! let mut app = common::test_app(Arc::new(backend.clone()));
//! let mut rx = common::start(&mut app).await;
//! ```

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chatstack::adapters::BackendSettings;
use chatstack::app::{App, AppMessage};
use chatstack::domain::PresentationSettings;
use chatstack::models::{ColorScheme, ThemeTokens, UserRef, UserToken};
use chatstack::traits::ChatBackend;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Upper bound for waiting on a single app message.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// App for user `ron` with the light theme.
pub fn test_app(backend: Arc<dyn ChatBackend>) -> App {
    let user = UserRef::new("ron");
    let settings = PresentationSettings::new(
        &user,
        ColorScheme::Light,
        ThemeTokens::for_scheme(ColorScheme::Light),
    );
    App::new(backend, user, UserToken::new("USER_TOKEN"), settings)
}

/// Start the session and take the app's message receiver.
pub fn start(app: &mut App) -> mpsc::UnboundedReceiver<AppMessage> {
    let rx = app.message_rx.take().expect("receiver already taken");
    app.start_session();
    rx
}

/// Feed messages into the app until one matches `done`; returns that message's
/// debug text for assertions.
pub async fn pump_until<F>(
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
    done: F,
) -> String
where
    F: Fn(&AppMessage) -> bool,
{
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for app message")
            .expect("app message channel closed");
        let matched = done(&msg);
        let text = format!("{:?}", msg);
        app.handle_message(msg);
        if matched {
            return text;
        }
    }
}

/// Settings pointing at a local REST mock and websocket server.
pub fn local_settings(base_url: &str, ws_url: &str) -> BackendSettings {
    BackendSettings {
        base_url: base_url.to_string(),
        ws_url: ws_url.to_string(),
        api_key: "API_TOKEN".to_string(),
        connect_timeout: Duration::from_secs(5),
    }
}

/// The `health.check` frame the service sends after a successful upgrade.
pub fn handshake_frame(connection_id: &str, user_id: &str) -> String {
    serde_json::json!({
        "type": "health.check",
        "connection_id": connection_id,
        "me": { "id": user_id },
    })
    .to_string()
}

/// Spawn a websocket server that accepts one connection, sends `frames` in
/// order, then reads until the client goes away.
///
/// Returns the `ws://` base URL and a receiver for the request URI the
/// client connected with.
pub async fn spawn_ws_server(
    frames: Vec<String>,
) -> (String, tokio::sync::oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (uri_tx, uri_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = move |request: &Request,
                             response: Response|
              -> Result<Response, ErrorResponse> {
            let _ = uri_tx.send(request.uri().to_string());
            Ok(response)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .unwrap();
        for frame in frames {
            if ws.send(WsMessage::Text(frame)).await.is_err() {
                return;
            }
        }
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });

    (format!("ws://{}", addr), uri_rx)
}
