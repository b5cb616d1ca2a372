//! Mock implementations for testing.
//!
//! [`MockChatBackend`] keeps everything in memory, so the navigation core and
//! the UI can be exercised without network access.

pub mod backend;

pub use backend::{MockChannel, MockChatBackend, RecordedCall};
