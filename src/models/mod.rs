//! Domain models shared by the backend adapters, the navigation core and the UI.

mod channel;
mod message;
pub mod query;
mod reaction;
pub mod theme;
mod thread;
mod user;

pub use channel::{sort_by_last_message, ChannelRef, ChannelState};
pub use message::{Message, NewMessage, OwnReaction};
pub use query::{ChannelFilter, ChannelQuery, ChannelSort, QueryOptions, SortDirection};
pub use reaction::{ReactionDescriptor, ReactionSet, SUPPORTED_REACTIONS};
pub use theme::{ColorScheme, ThemeTokens};
pub use thread::ThreadRef;
pub use user::{ConnectedUser, UserRef, UserToken};
