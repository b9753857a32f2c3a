//! Desktop frame intents.

use peerview_core::events::{ContentScreenUpdate, ContentTab, GlobalEvent};
use peerview_core::tab::{TabSelection, select_tab};
use serde::{Deserialize, Serialize};

use super::model::State;

/// Gestures on the side rail and its menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Tab(ContentTab),
    Settings,
    RawDatabase,
    SelfProfile,
    Download,
    Translate,
    BugReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RequestTab(ContentTab),
    RequestScrollToTop(ContentTab),
    ChangeTab(ContentTab),
    UpdateBadge(ContentTab, u32),
    LocalizationLoaded,
    ApproveCheckingNewVersion,
    OpenSettings,
    OpenRawDatabase,
    OpenSelfProfile,
    Download,
    Translate,
    BugReport,
}

pub fn from_gesture(state: &State, gesture: Gesture) -> Action {
    match gesture {
        Gesture::Tab(tab) => match select_tab(state.current_tab, tab) {
            TabSelection::Switch(tab) => Action::RequestTab(tab),
            TabSelection::Reselect(tab) => Action::RequestScrollToTop(tab),
        },
        Gesture::Settings => Action::OpenSettings,
        Gesture::RawDatabase => Action::OpenRawDatabase,
        Gesture::SelfProfile => Action::OpenSelfProfile,
        Gesture::Download => Action::Download,
        Gesture::Translate => Action::Translate,
        Gesture::BugReport => Action::BugReport,
    }
}

pub fn from_event(event: &GlobalEvent) -> Option<Action> {
    match event {
        GlobalEvent::ContentScreenUpdate(update) => match *update {
            ContentScreenUpdate::ChangeTab { tab } => Some(Action::ChangeTab(tab)),
            ContentScreenUpdate::HomeUpdates { counter } => {
                Some(Action::UpdateBadge(ContentTab::Home, counter))
            }
            ContentScreenUpdate::MessagesUpdates { counter } => {
                Some(Action::UpdateBadge(ContentTab::Messages, counter))
            }
            ContentScreenUpdate::ContactsUpdates { counter } => {
                Some(Action::UpdateBadge(ContentTab::Contacts, counter))
            }
            ContentScreenUpdate::ProfilesUpdates { counter } => {
                Some(Action::UpdateBadge(ContentTab::Profiles, counter))
            }
            ContentScreenUpdate::ScrollToTop { .. } | ContentScreenUpdate::DiscoverUpdate { .. } => {
                None
            }
        },
        GlobalEvent::LocalizationLoaded => Some(Action::LocalizationLoaded),
        GlobalEvent::ApproveCheckingNewVersion => Some(Action::ApproveCheckingNewVersion),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::desktop_frame::model::initial_state;

    #[test]
    fn test_tab_press_is_a_request() {
        let state = initial_state();
        assert_eq!(
            from_gesture(&state, Gesture::Tab(ContentTab::Contacts)),
            Action::RequestTab(ContentTab::Contacts)
        );
        assert_eq!(
            from_gesture(&state, Gesture::Tab(ContentTab::Home)),
            Action::RequestScrollToTop(ContentTab::Home)
        );
    }

    #[test]
    fn test_counters_become_badges() {
        let event = ContentScreenUpdate::ContactsUpdates { counter: 4 }.into();
        assert_eq!(
            from_event(&event),
            Some(Action::UpdateBadge(ContentTab::Contacts, 4))
        );
    }
}
