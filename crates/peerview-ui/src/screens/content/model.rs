//! Content screen state, lenses and reducers.

use peerview_core::backend::BackendUpdate;
use peerview_core::events::{ContactsTab, ContentTab, MessagesTab};
use peerview_core::ids::FeedId;
use peerview_core::lens::Lens;
use peerview_core::reducer::Reducer;
use peerview_core::tab::TabId;
use serde::Serialize;

use super::intent::Action;
use crate::screens::{TabContext, contacts, messages};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub current_tab: ContentTab,
    pub is_drawer_open: bool,
    pub initialized_ssb: bool,
    pub num_of_home_updates: u32,
    pub num_of_messages_updates: u32,
    pub num_of_contacts_updates: u32,
    pub num_of_profiles_updates: u32,
    pub discover_substate: u32,
    pub messages_tab: Option<messages::State>,
    pub contacts_tab: Option<contacts::State>,
}

pub fn initial_state() -> State {
    State {
        self_feed_id: FeedId::default(),
        self_avatar_url: None,
        current_tab: ContentTab::PRIMARY,
        is_drawer_open: false,
        initialized_ssb: false,
        num_of_home_updates: 0,
        num_of_messages_updates: 0,
        num_of_contacts_updates: 0,
        num_of_profiles_updates: 0,
        discover_substate: 0,
        messages_tab: None,
        contacts_tab: None,
    }
}

pub fn init() -> Reducer<State> {
    Reducer::init("init", initial_state)
}

impl State {
    /// Sub-tab of the messages screen, primary until it has state.
    pub fn messages_sub_tab(&self) -> MessagesTab {
        self.messages_tab
            .as_ref()
            .map_or(MessagesTab::PRIMARY, |m| m.current_tab)
    }

    pub fn contacts_sub_tab(&self) -> ContactsTab {
        self.contacts_tab
            .as_ref()
            .map_or(ContactsTab::PRIMARY, |c| c.current_tab)
    }
}

fn context(parent: &State, tab: ContentTab) -> TabContext {
    TabContext {
        is_visible: parent.current_tab == tab,
        self_feed_id: parent.self_feed_id.clone(),
        self_avatar_url: parent.self_avatar_url.clone(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MessagesScreenLens;

impl Lens for MessagesScreenLens {
    type Parent = State;
    type Child = messages::State;
    type Shared = TabContext;

    fn derive_shared(&self, parent: &State) -> TabContext {
        context(parent, ContentTab::Messages)
    }

    fn default_local(&self, parent: &State) -> messages::State {
        messages::State {
            initialized_ssb: parent.initialized_ssb,
            ..messages::model::initial_state()
        }
    }

    fn overlay(&self, child: &mut messages::State, ctx: TabContext) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a messages::State> {
        parent.messages_tab.as_ref()
    }

    fn fold_back(&self, parent: &mut State, child: &messages::State) {
        parent.num_of_messages_updates = child.num_of_public_updates + child.num_of_private_updates;
    }

    fn store(&self, parent: &mut State, child: messages::State) {
        parent.messages_tab = Some(child);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContactsScreenLens;

impl Lens for ContactsScreenLens {
    type Parent = State;
    type Child = contacts::State;
    type Shared = TabContext;

    fn derive_shared(&self, parent: &State) -> TabContext {
        context(parent, ContentTab::Contacts)
    }

    fn default_local(&self, parent: &State) -> contacts::State {
        contacts::State {
            initialized_ssb: parent.initialized_ssb,
            ..contacts::model::initial_state()
        }
    }

    fn overlay(&self, child: &mut contacts::State, ctx: TabContext) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a contacts::State> {
        parent.contacts_tab.as_ref()
    }

    fn fold_back(&self, parent: &mut State, child: &contacts::State) {
        parent.num_of_contacts_updates = child.num_of_activity_updates;
    }

    fn store(&self, parent: &mut State, child: contacts::State) {
        parent.contacts_tab = Some(child);
    }
}

pub fn backend_reducer(update: &BackendUpdate) -> Option<Reducer<State>> {
    match update {
        BackendUpdate::SelfFeedId(id) => {
            let id = id.clone();
            Some(Reducer::update("setSelfFeedId", move |prev: State| State {
                self_feed_id: id,
                ..prev
            }))
        }
        BackendUpdate::About(about) => {
            let image_url = about.image_url.clone();
            Some(Reducer::update("aboutReducer", move |prev: State| State {
                self_avatar_url: image_url,
                ..prev
            }))
        }
        BackendUpdate::Initialized => Some(Reducer::update("initializedReducer", |prev: State| {
            State {
                initialized_ssb: true,
                ..prev
            }
        })),
        _ => None,
    }
}

pub fn reducer(action: &Action) -> Option<Reducer<State>> {
    match *action {
        Action::ChangeTab(current_tab) => {
            Some(Reducer::update("changeTabReducer", move |prev: State| State {
                current_tab,
                ..prev
            }))
        }
        Action::DrawerToggled(is_drawer_open) => {
            Some(Reducer::update("isDrawerOpenReducer", move |prev: State| State {
                is_drawer_open,
                ..prev
            }))
        }
        Action::HomeUpdates(counter) => {
            Some(Reducer::update("homeUpdatesReducer", move |prev: State| State {
                num_of_home_updates: counter,
                ..prev
            }))
        }
        Action::ProfilesUpdates(counter) => Some(Reducer::update(
            "profilesUpdatesReducer",
            move |prev: State| State {
                num_of_profiles_updates: counter,
                ..prev
            },
        )),
        Action::DiscoverUpdate(substate) => Some(Reducer::update(
            "discoverUpdateReducer",
            move |prev: State| State {
                discover_substate: substate,
                ..prev
            },
        )),
        Action::RequestTab(_)
        | Action::ScrollToTop(_)
        | Action::CloseDrawer
        | Action::DelegateBack
        | Action::BackToHome
        | Action::ExitApp
        | Action::OpenProfile(_)
        | Action::OpenThread(_)
        | Action::OpenHashtag(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arb_tab() -> impl Strategy<Value = ContentTab> {
        proptest::sample::select(ContentTab::ALL)
    }

    fn arb_parent() -> impl Strategy<Value = State> {
        (arb_tab(), any::<bool>(), proptest::option::of("[a-z]{1,6}")).prop_map(
            |(current_tab, initialized_ssb, avatar)| State {
                current_tab,
                initialized_ssb,
                self_feed_id: FeedId::new("@me"),
                self_avatar_url: avatar,
                ..initial_state()
            },
        )
    }

    proptest! {
        #[test]
        fn test_messages_lens_laws(parent in arb_parent(), public in 0u32..10, private in 0u32..10) {
            let default = MessagesScreenLens.get(&parent);
            prop_assert_eq!(default.is_visible, parent.current_tab == ContentTab::Messages);
            prop_assert_eq!(&default.self_avatar_url, &parent.self_avatar_url);
            prop_assert_eq!(default.initialized_ssb, parent.initialized_ssb);

            let child = messages::State {
                num_of_public_updates: public,
                num_of_private_updates: private,
                is_visible: !default.is_visible,
                ..default
            };
            let once = MessagesScreenLens.set(parent, child);
            prop_assert_eq!(once.num_of_messages_updates, public + private);
            let twice = MessagesScreenLens.set(once.clone(), MessagesScreenLens.get(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_contacts_lens_laws(parent in arb_parent(), activity in 0u32..10) {
            let child = contacts::State {
                num_of_activity_updates: activity,
                ..ContactsScreenLens.get(&parent)
            };
            let once = ContactsScreenLens.set(parent, child);
            prop_assert_eq!(once.num_of_contacts_updates, activity);
            let twice = ContactsScreenLens.set(once.clone(), ContactsScreenLens.get(&once));
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_sub_tabs_default_to_primary() {
        let state = initial_state();
        assert_eq!(state.messages_sub_tab(), MessagesTab::Public);
        assert_eq!(state.contacts_sub_tab(), ContactsTab::Activity);
    }
}
