//! Concrete implementations of [`crate::traits::ChatBackend`].
//!
//! # Adapters
//!
//! - [`RestChatBackend`] - hosted service over reqwest and tokio-tungstenite
//! - [`WsConnection`] - the socket half of the hosted adapter
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides [`mock::MockChatBackend`], an in-memory
//! backend used by tests and by `--demo`.

pub mod mock;
pub mod rest_backend;
pub mod ws_connection;

pub use mock::MockChatBackend;
pub use rest_backend::{BackendSettings, RestChatBackend};
pub use ws_connection::WsConnection;
