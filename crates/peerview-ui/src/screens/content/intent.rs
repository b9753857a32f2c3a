//! Content screen intents.

use peerview_core::events::{ContentScreenUpdate, ContentTab, GlobalEvent};
use peerview_core::ids::{FeedId, MsgId};
use peerview_core::tab::{TabSelection, TabId, select_tab};

use super::model::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Another tab was pressed; announce it on the bus.
    RequestTab(ContentTab),
    ChangeTab(ContentTab),
    ScrollToTop(ContentTab),
    CloseDrawer,
    /// Let the visible central screen resolve the back press.
    DelegateBack,
    BackToHome,
    ExitApp,
    DrawerToggled(bool),
    HomeUpdates(u32),
    ProfilesUpdates(u32),
    DiscoverUpdate(u32),
    OpenProfile(FeedId),
    OpenThread(MsgId),
    OpenHashtag(String),
}

pub fn tab_pressed(state: &State, tab: ContentTab) -> Action {
    match select_tab(state.current_tab, tab) {
        TabSelection::Switch(tab) => Action::RequestTab(tab),
        TabSelection::Reselect(tab) => Action::ScrollToTop(tab),
    }
}

/// Bus events addressed to the content screen itself.
///
/// Events of the embedded screens' families are routed by the caller.
pub fn from_event(state: &State, event: &GlobalEvent) -> Option<Action> {
    match event {
        GlobalEvent::ContentScreenUpdate(update) => match *update {
            ContentScreenUpdate::ChangeTab { tab } => Some(match select_tab(state.current_tab, tab) {
                TabSelection::Switch(tab) => Action::ChangeTab(tab),
                TabSelection::Reselect(tab) => Action::ScrollToTop(tab),
            }),
            ContentScreenUpdate::ScrollToTop { tab } => Some(Action::ScrollToTop(tab)),
            ContentScreenUpdate::HomeUpdates { counter } => Some(Action::HomeUpdates(counter)),
            ContentScreenUpdate::ProfilesUpdates { counter } => {
                Some(Action::ProfilesUpdates(counter))
            }
            ContentScreenUpdate::DiscoverUpdate { substate } => {
                Some(Action::DiscoverUpdate(substate))
            }
            // Our own announcements.
            ContentScreenUpdate::MessagesUpdates { .. }
            | ContentScreenUpdate::ContactsUpdates { .. } => None,
        },
        GlobalEvent::HardwareBackOnContentScreen => Some(if state.is_drawer_open {
            Action::CloseDrawer
        } else {
            match state.current_tab {
                ContentTab::Messages | ContentTab::Contacts => Action::DelegateBack,
                tab if tab == ContentTab::PRIMARY => Action::ExitApp,
                _ => Action::BackToHome,
            }
        }),
        GlobalEvent::DrawerToggleOnContentScreen { open } => Some(Action::DrawerToggled(*open)),
        GlobalEvent::TriggerFeedCypherlink { feed_id } => Some(Action::OpenProfile(feed_id.clone())),
        GlobalEvent::TriggerMsgCypherlink { msg_id } => Some(Action::OpenThread(msg_id.clone())),
        GlobalEvent::TriggerHashtagLink { hashtag } => Some(Action::OpenHashtag(hashtag.clone())),
        _ => None,
    }
}
