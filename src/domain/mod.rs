//! Navigation and session core.
//!
//! These objects are owned by the [`App`](crate::app::App) and passed around
//! explicitly; none of them touches the terminal or the network directly.
//!
//! - [`SessionManager`] - the single backend connection and its readiness gate
//! - [`SelectionStore`] - selected channel and thread
//! - [`Router`] - List → Channel → Thread navigation and the overlay gate
//! - [`present`] - per-screen props derived from the above

pub mod presentation;
pub mod router;
pub mod selection;
pub mod session;

pub use presentation::{
    navigation_theme, present, ChannelListProps, ChannelProps, NavigationTheme,
    PresentationSettings, ScreenProps, ThreadProps,
};
pub use router::{BackSource, IgnoreReason, NavEvent, Overlay, Router, Screen, Transition};
pub use selection::SelectionStore;
pub use session::{ConnectTicket, ConnectionState, Ready, SessionManager};
