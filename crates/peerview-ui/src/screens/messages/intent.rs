//! Messages screen intents.

use peerview_core::events::{GlobalEvent, MessageScreenUpdate, MessagesTab};
use peerview_core::tab::{BackAction, TabSelection, resolve_back, select_tab};

use super::model::State;

/// What the screen decided to do with an input it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChangeTab(MessagesTab),
    ScrollToPublicTop,
    ScrollToPrivateTop,
    CloseDrawer,
    BackToPublicTab,
    ExitApp,
    DrawerToggled(bool),
}

fn scroll_to(tab: MessagesTab) -> Action {
    match tab {
        MessagesTab::Public => Action::ScrollToPublicTop,
        MessagesTab::Private => Action::ScrollToPrivateTop,
    }
}

/// A tab button press, or a bus request for `tab`.
pub fn tab_pressed(state: &State, tab: MessagesTab) -> Action {
    match select_tab(state.current_tab, tab) {
        TabSelection::Switch(tab) => Action::ChangeTab(tab),
        TabSelection::Reselect(tab) => scroll_to(tab),
    }
}

/// A bus event that this screen reacts to itself.
pub fn from_event(state: &State, event: &GlobalEvent) -> Option<Action> {
    match event {
        GlobalEvent::MessageScreenUpdate(MessageScreenUpdate::ChangeTab { tab }) => {
            Some(tab_pressed(state, *tab))
        }
        GlobalEvent::MessageScreenUpdate(MessageScreenUpdate::ScrollToTop { tab }) => {
            Some(scroll_to(*tab))
        }
        // Back presses reach every central screen; only the visible one answers.
        GlobalEvent::HardwareBackOnCentralScreen if state.is_visible => {
            Some(match resolve_back(state.is_drawer_open, state.current_tab) {
                BackAction::CloseDrawer => Action::CloseDrawer,
                BackAction::BackToPrimary => Action::BackToPublicTab,
                BackAction::Exit => Action::ExitApp,
            })
        }
        GlobalEvent::DrawerToggleOnCentralScreen { open } => Some(Action::DrawerToggled(*open)),
        _ => None,
    }
}
