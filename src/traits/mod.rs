//! Trait abstractions for dependency injection and testability.
//!
//! - [`ChatBackend`] - hosted chat service operations (connect, channels,
//!   messages, reactions, real-time events)

pub mod backend;

pub use backend::{BackendEvent, ChatBackend};
