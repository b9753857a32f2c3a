//! Messages screen state, lenses and reducers.

use peerview_core::backend::BackendUpdate;
use peerview_core::events::MessagesTab;
use peerview_core::ids::FeedId;
use peerview_core::lens::Lens;
use peerview_core::reducer::Reducer;
use serde::Serialize;

use super::intent::Action;
use super::{private_tab, public_tab};
use crate::screens::TabContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub last_session_timestamp: Option<u64>,
    pub current_tab: MessagesTab,
    pub public_tab: Option<public_tab::State>,
    pub private_tab: Option<private_tab::State>,
    pub initialized_ssb: bool,
    pub num_of_public_updates: u32,
    pub num_of_private_updates: u32,
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
        current_tab: MessagesTab::Public,
        public_tab: None,
        private_tab: None,
        initialized_ssb: false,
        num_of_public_updates: 0,
        num_of_private_updates: 0,
        migration_progress: 0.0,
        indexing_progress: 0.0,
        can_publish_ssb: true,
        is_drawer_open: false,
    }
}

pub fn init() -> Reducer<State> {
    Reducer::init("init", initial_state)
}

// ============================================================================
// Lenses
// ============================================================================

fn context(parent: &State, tab: MessagesTab) -> TabContext {
    TabContext {
        is_visible: parent.is_visible && parent.current_tab == tab,
        self_feed_id: parent.self_feed_id.clone(),
        self_avatar_url: parent.self_avatar_url.clone(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PublicTabLens;

impl Lens for PublicTabLens {
    type Parent = State;
    type Child = public_tab::State;
    type Shared = (TabContext, bool);

    fn derive_shared(&self, parent: &State) -> Self::Shared {
        (context(parent, MessagesTab::Public), parent.can_publish_ssb)
    }

    fn default_local(&self, parent: &State) -> public_tab::State {
        public_tab::State {
            last_session_timestamp: parent.last_session_timestamp,
            num_of_updates: parent.num_of_public_updates,
            initialized_ssb: parent.initialized_ssb,
            ..public_tab::State::default()
        }
    }

    fn overlay(&self, child: &mut public_tab::State, (ctx, can_publish_ssb): Self::Shared) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
        child.can_publish_ssb = can_publish_ssb;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a public_tab::State> {
        parent.public_tab.as_ref()
    }

    fn fold_back(&self, parent: &mut State, child: &public_tab::State) {
        parent.initialized_ssb = child.initialized_ssb;
        parent.num_of_public_updates = child.num_of_updates;
        parent.last_session_timestamp = child.last_session_timestamp;
    }

    fn store(&self, parent: &mut State, child: public_tab::State) {
        parent.public_tab = Some(child);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrivateTabLens;

impl Lens for PrivateTabLens {
    type Parent = State;
    type Child = private_tab::State;
    type Shared = TabContext;

    fn derive_shared(&self, parent: &State) -> TabContext {
        context(parent, MessagesTab::Private)
    }

    fn default_local(&self, _parent: &State) -> private_tab::State {
        private_tab::State::default()
    }

    fn overlay(&self, child: &mut private_tab::State, ctx: TabContext) {
        child.is_visible = ctx.is_visible;
        child.self_feed_id = ctx.self_feed_id;
        child.self_avatar_url = ctx.self_avatar_url;
    }

    fn snapshot<'a>(&self, parent: &'a State) -> Option<&'a private_tab::State> {
        parent.private_tab.as_ref()
    }

    fn fold_back(&self, parent: &mut State, child: &private_tab::State) {
        parent.num_of_private_updates = child.updates.len() as u32;
    }

    fn store(&self, parent: &mut State, child: private_tab::State) {
        parent.private_tab = Some(child);
    }
}

// ============================================================================
// Reducers
// ============================================================================

/// Reducer for a backend update this screen folds itself.
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
        Action::BackToPublicTab => {
            Some(Reducer::update("backToPublicTabReducer", |prev: State| State {
                current_tab: MessagesTab::Public,
                ..prev
            }))
        }
        Action::DrawerToggled(is_drawer_open) => {
            Some(Reducer::update("isDrawerOpenReducer", move |prev: State| State {
                is_drawer_open,
                ..prev
            }))
        }
        Action::ScrollToPublicTop
        | Action::ScrollToPrivateTop
        | Action::CloseDrawer
        | Action::ExitApp => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use peerview_core::ids::MsgId;
    use proptest::prelude::*;

    use super::*;

    fn arb_parent() -> impl Strategy<Value = State> {
        (
            any::<bool>(),
            any::<bool>(),
            0u32..20,
            0u32..20,
            proptest::option::of(0u64..1000),
            any::<bool>(),
        )
            .prop_map(|(private, can_publish, public_n, private_n, ts, initialized)| State {
                current_tab: if private {
                    MessagesTab::Private
                } else {
                    MessagesTab::Public
                },
                self_feed_id: FeedId::new("@me"),
                can_publish_ssb: can_publish,
                num_of_public_updates: public_n,
                num_of_private_updates: private_n,
                last_session_timestamp: ts,
                initialized_ssb: initialized,
                ..initial_state()
            })
    }

    fn arb_public_child() -> impl Strategy<Value = public_tab::State> {
        (0u32..20, proptest::option::of(0u64..1000), any::<bool>(), any::<bool>()).prop_map(
            |(n, ts, initialized, draft)| public_tab::State {
                self_feed_id: FeedId::new("@child-write"),
                is_visible: draft,
                num_of_updates: n,
                last_session_timestamp: ts,
                initialized_ssb: initialized,
                has_compose_draft: draft,
                ..public_tab::State::default()
            },
        )
    }

    proptest! {
        #[test]
        fn test_public_lens_set_get_set(parent in arb_parent(), child in arb_public_child()) {
            let once = PublicTabLens.set(parent, child);
            let twice = PublicTabLens.set(once.clone(), PublicTabLens.get(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_public_lens_default_mirrors_parent(parent in arb_parent()) {
            let child = PublicTabLens.get(&parent);
            prop_assert_eq!(child.is_visible, parent.current_tab == MessagesTab::Public);
            prop_assert_eq!(&child.self_feed_id, &parent.self_feed_id);
            prop_assert_eq!(child.can_publish_ssb, parent.can_publish_ssb);
            prop_assert_eq!(child.num_of_updates, parent.num_of_public_updates);
            prop_assert_eq!(child.last_session_timestamp, parent.last_session_timestamp);
            prop_assert_eq!(child.initialized_ssb, parent.initialized_ssb);
        }

        #[test]
        fn test_private_lens_set_get_set(parent in arb_parent(), unread in 0usize..5) {
            let child = private_tab::State {
                updates: (0..unread).map(|i| MsgId::new(format!("%{i}"))).collect(),
                ..private_tab::State::default()
            };
            let once = PrivateTabLens.set(parent, child);
            let twice = PrivateTabLens.set(once.clone(), PrivateTabLens.get(&once));
            prop_assert_eq!(once.num_of_private_updates, unread as u32);
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_private_lens_default_is_empty() {
        let parent = State {
            current_tab: MessagesTab::Private,
            ..initial_state()
        };
        let child = PrivateTabLens.get(&parent);
        assert!(child.is_visible);
        assert_eq!(child.updates, BTreeSet::new());
    }

    #[test]
    fn test_hidden_screen_hides_both_tabs() {
        let parent = State {
            is_visible: false,
            ..initial_state()
        };
        assert!(!PublicTabLens.get(&parent).is_visible);
        assert!(!PrivateTabLens.get(&parent).is_visible);
    }

    #[test]
    fn test_migration_progress_gates_publishing() {
        let reducer = backend_reducer(&BackendUpdate::MigrationProgress(0.5)).unwrap();
        let state = reducer.apply(Some(initial_state())).unwrap();
        assert!(!state.can_publish_ssb);

        let reducer = backend_reducer(&BackendUpdate::MigrationProgress(1.0)).unwrap();
        let state = reducer.apply(Some(state)).unwrap();
        assert!(state.can_publish_ssb);
        assert!((state.migration_progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_init_is_idempotent() {
        let state = State {
            current_tab: MessagesTab::Private,
            ..initial_state()
        };
        assert_eq!(init().apply(Some(state.clone())), Some(state));
    }
}
