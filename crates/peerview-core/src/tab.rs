//! Tab-bar state machine shared by every screen with tabs.
//!
//! States are the tab identifiers. Any tab may follow any other; the only
//! rule is re-entrancy: selecting the tab that is already current is a
//! request to scroll it to the top, never a state change.

use std::fmt;

use crate::events::{ContactsTab, ContentTab, MessagesTab};

/// A closed set of tab identifiers with a designated primary tab.
pub trait TabId: Copy + Eq + fmt::Debug + 'static {
    /// Initial tab and the target of hardware back.
    const PRIMARY: Self;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// Outcome of a tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSelection<T> {
    /// Another tab was selected.
    Switch(T),
    /// The current tab was selected again.
    Reselect(T),
}

pub fn select_tab<T: TabId>(current: T, next: T) -> TabSelection<T> {
    if current == next {
        TabSelection::Reselect(next)
    } else {
        TabSelection::Switch(next)
    }
}

/// Resolution of a hardware back press. Exactly one applies per press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    CloseDrawer,
    BackToPrimary,
    Exit,
}

pub fn resolve_back<T: TabId>(is_drawer_open: bool, current: T) -> BackAction {
    if is_drawer_open {
        BackAction::CloseDrawer
    } else if current != T::PRIMARY {
        BackAction::BackToPrimary
    } else {
        BackAction::Exit
    }
}

impl TabId for ContentTab {
    const PRIMARY: Self = Self::Home;
    const ALL: &'static [Self] = &[
        Self::Home,
        Self::Messages,
        Self::Contacts,
        Self::Discover,
        Self::Profiles,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Messages => "messages",
            Self::Contacts => "contacts",
            Self::Discover => "discover",
            Self::Profiles => "profiles",
        }
    }
}

impl TabId for MessagesTab {
    const PRIMARY: Self = Self::Public;
    const ALL: &'static [Self] = &[Self::Public, Self::Private];

    fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl TabId for ContactsTab {
    const PRIMARY: Self = Self::Activity;
    const ALL: &'static [Self] = &[Self::Activity, Self::Connections];

    fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Connections => "connections",
        }
    }
}
