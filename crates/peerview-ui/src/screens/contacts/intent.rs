//! Contacts screen intents.

use peerview_core::events::{ContactScreenUpdate, ContactsTab, GlobalEvent};
use peerview_core::tab::{BackAction, TabSelection, resolve_back, select_tab};

use super::model::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChangeTab(ContactsTab),
    ScrollToActivityTop,
    ScrollToConnectionsTop,
    CloseDrawer,
    BackToActivityTab,
    ExitApp,
    DrawerToggled(bool),
}

fn scroll_to(tab: ContactsTab) -> Action {
    match tab {
        ContactsTab::Activity => Action::ScrollToActivityTop,
        ContactsTab::Connections => Action::ScrollToConnectionsTop,
    }
}

pub fn tab_pressed(state: &State, tab: ContactsTab) -> Action {
    match select_tab(state.current_tab, tab) {
        TabSelection::Switch(tab) => Action::ChangeTab(tab),
        TabSelection::Reselect(tab) => scroll_to(tab),
    }
}

pub fn from_event(state: &State, event: &GlobalEvent) -> Option<Action> {
    match event {
        GlobalEvent::ContactScreenUpdate(ContactScreenUpdate::ChangeTab { tab }) => {
            Some(tab_pressed(state, *tab))
        }
        GlobalEvent::ContactScreenUpdate(ContactScreenUpdate::ScrollToTop { tab }) => {
            Some(scroll_to(*tab))
        }
        GlobalEvent::HardwareBackOnCentralScreen if state.is_visible => {
            Some(match resolve_back(state.is_drawer_open, state.current_tab) {
                BackAction::CloseDrawer => Action::CloseDrawer,
                BackAction::BackToPrimary => Action::BackToActivityTab,
                BackAction::Exit => Action::ExitApp,
            })
        }
        GlobalEvent::DrawerToggleOnCentralScreen { open } => Some(Action::DrawerToggled(*open)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::contacts::model::initial_state;

    fn change_tab(tab: ContactsTab) -> GlobalEvent {
        ContactScreenUpdate::ChangeTab { tab }.into()
    }

    #[test]
    fn test_change_tab_then_reselect() {
        let mut state = initial_state();
        assert_eq!(
            from_event(&state, &change_tab(ContactsTab::Connections)),
            Some(Action::ChangeTab(ContactsTab::Connections))
        );

        state.current_tab = ContactsTab::Connections;
        assert_eq!(
            from_event(&state, &change_tab(ContactsTab::Connections)),
            Some(Action::ScrollToConnectionsTop)
        );
    }

    #[test]
    fn test_scroll_event_targets_named_tab() {
        let state = initial_state();
        let event = ContactScreenUpdate::ScrollToTop {
            tab: ContactsTab::Connections,
        }
        .into();
        assert_eq!(
            from_event(&state, &event),
            Some(Action::ScrollToConnectionsTop)
        );
    }

    #[test]
    fn test_counters_are_not_intents() {
        let state = initial_state();
        let event = ContactScreenUpdate::ActivityUpdates { counter: 3 }.into();
        assert_eq!(from_event(&state, &event), None);
    }
}
