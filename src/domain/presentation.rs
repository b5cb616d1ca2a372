//! Presentation adapter.
//!
//! Turns router and selection state plus static settings into the props each
//! screen renders from. Everything here is a pure read.

use super::router::{Router, Screen};
use super::selection::SelectionStore;
use crate::models::{
    ChannelQuery, ChannelRef, ColorScheme, ReactionSet, ThemeTokens, ThreadRef, UserRef,
    SUPPORTED_REACTIONS,
};

pub const CHANNEL_LIST_TITLE: &str = "Channel List";
pub const BACK_TITLE: &str = "Back";

/// Static configuration the screens are built from.
#[derive(Debug, Clone)]
pub struct PresentationSettings {
    /// Channel list query, built once per session
    pub list_query: ChannelQuery,
    pub reactions: ReactionSet,
    pub theme: ThemeTokens,
    pub scheme: ColorScheme,
}

impl PresentationSettings {
    pub fn new(user: &UserRef, scheme: ColorScheme, theme: ThemeTokens) -> Self {
        Self {
            list_query: ChannelQuery::for_user(user),
            reactions: SUPPORTED_REACTIONS,
            theme,
            scheme,
        }
    }

    pub fn navigation_theme(&self) -> NavigationTheme {
        navigation_theme(self.scheme, &self.theme)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelListProps<'a> {
    pub query: &'a ChannelQuery,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProps<'a> {
    pub channel: Option<&'a ChannelRef>,
    /// Channel name; `None` renders a blank title
    pub header_title: Option<&'a str>,
    pub back_title: &'static str,
    pub reactions: &'a ReactionSet,
    pub thread: Option<&'a ThreadRef>,
    pub gesture_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadProps<'a> {
    pub channel: Option<&'a ChannelRef>,
    pub thread: Option<&'a ThreadRef>,
    /// The thread header hides its back button
    pub header_left_visible: bool,
    pub gesture_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenProps<'a> {
    /// Nothing backend-dependent may render yet
    Splash,
    List(ChannelListProps<'a>),
    Channel(ChannelProps<'a>),
    Thread(ThreadProps<'a>),
}

impl ScreenProps<'_> {
    pub fn screen(&self) -> Option<Screen> {
        match self {
            ScreenProps::Splash => None,
            ScreenProps::List(_) => Some(Screen::List),
            ScreenProps::Channel(_) => Some(Screen::Channel),
            ScreenProps::Thread(_) => Some(Screen::Thread),
        }
    }
}

/// Navigation container colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTheme {
    pub dark: bool,
    pub background: String,
}

pub fn navigation_theme(scheme: ColorScheme, tokens: &ThemeTokens) -> NavigationTheme {
    NavigationTheme {
        dark: scheme.is_dark(),
        background: tokens.background().to_string(),
    }
}

/// Props for whatever the router currently shows.
pub fn present<'a>(
    router: &Router,
    selection: &'a SelectionStore,
    settings: &'a PresentationSettings,
) -> ScreenProps<'a> {
    let gesture_enabled = router.gesture_enabled();
    match router.screen() {
        None => ScreenProps::Splash,
        Some(Screen::List) => ScreenProps::List(ChannelListProps {
            query: &settings.list_query,
            title: CHANNEL_LIST_TITLE,
        }),
        Some(Screen::Channel) => ScreenProps::Channel(ChannelProps {
            channel: selection.channel(),
            header_title: selection.channel().and_then(ChannelRef::header_title),
            back_title: BACK_TITLE,
            reactions: &settings.reactions,
            thread: selection.thread(),
            gesture_enabled,
        }),
        Some(Screen::Thread) => ScreenProps::Thread(ThreadProps {
            channel: selection.channel(),
            thread: selection.thread(),
            header_left_visible: false,
            gesture_enabled,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::router::{NavEvent, Overlay};
    use crate::domain::session::SessionManager;
    use crate::models::{ConnectedUser, Message, UserToken};
    use std::collections::BTreeMap;

    fn settings() -> PresentationSettings {
        PresentationSettings::new(
            &UserRef::new("ron"),
            ColorScheme::Light,
            ThemeTokens::for_scheme(ColorScheme::Light),
        )
    }

    fn active_router() -> Router {
        let mut session = SessionManager::new(UserRef::new("ron"), UserToken::new("t"));
        let ticket = session.begin_connect().unwrap();
        session
            .complete(ticket, Ok(ConnectedUser::new(UserRef::new("ron"))))
            .unwrap();
        let mut router = Router::new();
        router.activate(&session);
        router
    }

    #[test]
    fn test_splash_before_activation() {
        let router = Router::new();
        let selection = SelectionStore::new();
        let settings = settings();
        assert_eq!(present(&router, &selection, &settings), ScreenProps::Splash);
    }

    #[test]
    fn test_list_props_carry_user_filter() {
        let router = active_router();
        let selection = SelectionStore::new();
        let settings = settings();

        match present(&router, &selection, &settings) {
            ScreenProps::List(props) => {
                assert_eq!(props.title, "Channel List");
                assert_eq!(props.query.filter.members_in, vec!["ron".to_string()]);
                assert_eq!(props.query.filter.kind, "messaging");
                assert_eq!(props.query.sort.field, "last_message_at");
            }
            other => panic!("expected list props, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_props() {
        let mut router = active_router();
        let mut selection = SelectionStore::new();
        let settings = settings();
        let channel = ChannelRef::new("messaging", "general").with_name("General");
        router.dispatch(NavEvent::ChannelSelected(channel.clone()), &mut selection);

        match present(&router, &selection, &settings) {
            ScreenProps::Channel(props) => {
                assert_eq!(props.channel, Some(&channel));
                assert_eq!(props.header_title, Some("General"));
                assert_eq!(props.back_title, "Back");
                assert_eq!(props.reactions.len(), 4);
                assert!(props.gesture_enabled);
                assert!(props.thread.is_none());
            }
            other => panic!("expected channel props, got {:?}", other),
        }
    }

    #[test]
    fn test_unnamed_channel_has_blank_title() {
        let mut router = active_router();
        let mut selection = SelectionStore::new();
        let settings = settings();
        router.dispatch(
            NavEvent::ChannelSelected(ChannelRef::new("messaging", "unnamed")),
            &mut selection,
        );
        router.open_overlay(Overlay::ReactionPicker {
            message_id: "m1".to_string(),
        });

        match present(&router, &selection, &settings) {
            ScreenProps::Channel(props) => {
                assert_eq!(props.header_title, None);
                assert!(!props.gesture_enabled);
            }
            other => panic!("expected channel props, got {:?}", other),
        }
    }

    #[test]
    fn test_thread_props_hide_back_button() {
        let mut router = active_router();
        let mut selection = SelectionStore::new();
        let settings = settings();
        router.dispatch(
            NavEvent::ChannelSelected(ChannelRef::new("messaging", "general")),
            &mut selection,
        );
        let root = Message::new("m1", "root", UserRef::new("ron"));
        let thread = ThreadRef::from_message(&root, "messaging:general");
        router.dispatch(NavEvent::ThreadSelected(thread.clone()), &mut selection);

        let props = present(&router, &selection, &settings);
        assert_eq!(props.screen(), Some(Screen::Thread));
        match props {
            ScreenProps::Thread(props) => {
                assert!(!props.header_left_visible);
                assert_eq!(props.thread, Some(&thread));
            }
            other => panic!("expected thread props, got {:?}", other),
        }
    }

    #[test]
    fn test_navigation_theme_background_fallback() {
        let theme = navigation_theme(ColorScheme::Dark, &ThemeTokens::default());
        assert!(theme.dark);
        assert_eq!(theme.background, "#FCFCFC");

        let mut colors = BTreeMap::new();
        colors.insert("white_snow".to_string(), "#EEEEEE".to_string());
        let theme = navigation_theme(ColorScheme::Light, &ThemeTokens { colors });
        assert!(!theme.dark);
        assert_eq!(theme.background, "#EEEEEE");
    }
}
