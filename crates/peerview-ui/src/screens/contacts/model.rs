//! Contacts screen state, lenses and reducers.

use peerview_core::backend::BackendUpdate;
use peerview_core::events::ContactsTab;
use peerview_core::ids::FeedId;
use peerview_core::lens::Lens;
use peerview_core::reducer::Reducer;
use serde::Serialize;

use super::intent::Action;
use super::{activity_tab, connections_tab};
use crate::screens::TabContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub last_session_timestamp: Option<u64>,
    pub current_tab: ContactsTab,
    pub activity_tab: Option<activity_tab::State>,
    pub connections_tab: Option<connections_tab::State>,
    pub initialized_ssb: bool,
    pub num_of_activity_updates: u32,
    pub migration_progress: f64,
    pub indexing_progress: f64,
    pub can_publish_ssb: bool,
    pub is_drawer_open: bool,
}

pub fn initial_state() -> State {
    State {
        is_visible: true,
        self_feed_id: FeedId::default(),
        self_avatar_url: None,
        last_session_timestamp: None,
        current_tab: ContactsTab::Activity,
        activity_tab: None,
        connections_tab: None,
        initialized_ssb: false,
        num_of_activity_updates: 0,
        migration_progress: 0.0,
        indexing_progress: 0.0,
        can_publish_ssb: true,
        is_drawer_open: false,
    }
}

pub fn init() -> Reducer<State> {
    Reducer::init("init", initial_state)
}

fn context(parent: &State, tab: ContactsTab) -> TabContext {
    TabContext {
        is_visible: parent.is_visible && parent.current_tab == tab,
        self_feed_id: parent.self_feed_id.clone(),
        self_avatar_url: parent.self_avatar_url.clone(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActivityTabLens;

impl Lens for ActivityTabLens {
    type Parent = State;
    type Child = activity_tab::State;
    type Shared = TabContext;

    fn derive_shared(&self, parent: &State) -> TabContext {
        context(parent, ContactsTab::Activity)
    }

    fn default_local(&self, parent: &State) -> activity_tab::State {
        activity_tab::State {
            num_of_updates: parent.num_of_activity_updates,
            last_session_timestamp: parent.last_session_timestamp,
            ..activity_tab::State::default()
        }
    }

    fn overlay(&self, child: &mut activity_tab::State, ctx: TabContext) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a activity_tab::State> {
        parent.activity_tab.as_ref()
    }

    fn fold_back(&self, parent: &mut State, child: &activity_tab::State) {
        parent.num_of_activity_updates = child.num_of_updates;
        parent.last_session_timestamp = child.last_session_timestamp;
    }

    fn store(&self, parent: &mut State, child: activity_tab::State) {
        parent.activity_tab = Some(child);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionsTabLens;

impl Lens for ConnectionsTabLens {
    type Parent = State;
    type Child = connections_tab::State;
    type Shared = (TabContext, bool);

    fn derive_shared(&self, parent: &State) -> Self::Shared {
        (
            context(parent, ContactsTab::Connections),
            parent.initialized_ssb,
        )
    }

    fn default_local(&self, _parent: &State) -> connections_tab::State {
        connections_tab::State::default()
    }

    fn overlay(&self, child: &mut connections_tab::State, (ctx, initialized_ssb): Self::Shared) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
        child.initialized_ssb = initialized_ssb;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a connections_tab::State> {
        parent.connections_tab.as_ref()
    }

    fn fold_back(&self, _parent: &mut State, _child: &connections_tab::State) {}

    fn store(&self, parent: &mut State, child: connections_tab::State) {
        parent.connections_tab = Some(child);
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
        &BackendUpdate::MigrationProgress(migration_progress) => Some(Reducer::update(
            "migrationProgressReducer",
            move |prev: State| State {
                migration_progress,
                can_publish_ssb: migration_progress >= 1.0,
                ..prev
            },
        )),
        &BackendUpdate::IndexingProgress(indexing_progress) => Some(Reducer::update(
            "indexingProgressReducer",
            move |prev: State| State {
                indexing_progress,
                ..prev
            },
        )),
        _ => None,
    }
}

pub fn reducer(action: Action) -> Option<Reducer<State>> {
    match action {
        Action::ChangeTab(current_tab) => {
            Some(Reducer::update("changeTabReducer", move |prev: State| State {
                current_tab,
                ..prev
            }))
        }
        Action::BackToActivityTab => {
            Some(Reducer::update("backToActivityTabReducer", |prev: State| State {
                current_tab: ContactsTab::Activity,
                ..prev
            }))
        }
        Action::DrawerToggled(is_drawer_open) => {
            Some(Reducer::update("isDrawerOpenReducer", move |prev: State| State {
                is_drawer_open,
                ..prev
            }))
        }
        Action::ScrollToActivityTop
        | Action::ScrollToConnectionsTop
        | Action::CloseDrawer
        | Action::ExitApp => None,
    }
}

#[cfg(test)]
mod tests {
    use peerview_core::ids::Peer;
    use proptest::prelude::*;

    use super::*;

    fn arb_parent() -> impl Strategy<Value = State> {
        (
            any::<bool>(),
            any::<bool>(),
            0u32..50,
            proptest::option::of(0u64..100),
        )
            .prop_map(|(connections, initialized, n, last_session_timestamp)| State {
            current_tab: if connections {
                ContactsTab::Connections
            } else {
                ContactsTab::Activity
            },
            initialized_ssb: initialized,
            num_of_activity_updates: n,
            last_session_timestamp,
            self_feed_id: FeedId::new("@me"),
            ..initial_state()
        })
    }

    proptest! {
        #[test]
        fn test_activity_lens_set_get_set(parent in arb_parent(), n in 0u32..50, ts in proptest::option::of(0u64..100)) {
            let child = activity_tab::State {
                num_of_updates: n,
                last_session_timestamp: ts,
                self_feed_id: FeedId::new("@ignored"),
                ..activity_tab::State::default()
            };
            let once = ActivityTabLens.set(parent, child);
            let twice = ActivityTabLens.set(once.clone(), ActivityTabLens.get(&once));
            prop_assert_eq!(once.num_of_activity_updates, n);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_connections_lens_set_get_set(parent in arb_parent(), staged in 0usize..4) {
            let child = connections_tab::State {
                initialized_ssb: !parent.initialized_ssb,
                staged_peers: (0..staged)
                    .map(|i| Peer { id: FeedId::new(format!("@p{i}")), name: None, connected: false })
                    .collect(),
                ..connections_tab::State::default()
            };
            let once = ConnectionsTabLens.set(parent.clone(), child);
            let twice = ConnectionsTabLens.set(once.clone(), ConnectionsTabLens.get(&once));
            prop_assert_eq!(ConnectionsTabLens.get(&once).initialized_ssb, parent.initialized_ssb);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_default_children_mirror_parent(parent in arb_parent()) {
            let activity = ActivityTabLens.get(&parent);
            let connections = ConnectionsTabLens.get(&parent);
            prop_assert_eq!(activity.num_of_updates, parent.num_of_activity_updates);
            prop_assert_eq!(activity.last_session_timestamp, parent.last_session_timestamp);
            prop_assert_eq!(activity.is_visible, parent.current_tab == ContactsTab::Activity);
            prop_assert_eq!(connections.is_visible, parent.current_tab == ContactsTab::Connections);
            prop_assert_eq!(connections.initialized_ssb, parent.initialized_ssb);
        }
    }

    fn fold(state: State, update: &BackendUpdate) -> State {
        backend_reducer(update)
            .and_then(|reducer| reducer.apply(Some(state)))
            .unwrap()
    }

    #[test]
    fn test_migration_gates_publishing() {
        let state = fold(initial_state(), &BackendUpdate::MigrationProgress(0.4));
        assert_eq!(state.migration_progress, 0.4);
        assert!(!state.can_publish_ssb);

        let state = fold(state, &BackendUpdate::MigrationProgress(1.0));
        assert!(state.can_publish_ssb);
    }

    #[test]
    fn test_indexing_progress_is_recorded() {
        let state = fold(initial_state(), &BackendUpdate::IndexingProgress(0.75));
        assert_eq!(state.indexing_progress, 0.75);
        assert!(state.can_publish_ssb);
    }
}
