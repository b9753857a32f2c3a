//! Public feed tab.

use peerview_core::backend::BackendUpdate;
use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::ids::FeedId;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::{Fab, View};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub can_publish_ssb: bool,
    pub last_session_timestamp: Option<u64>,
    pub num_of_updates: u32,
    pub initialized_ssb: bool,
    pub has_compose_draft: bool,
    /// Bumped on every scroll-to-top request; the list re-anchors on change.
    pub scroll_to_top: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Pull-to-refresh. Marks everything up to `at` as seen.
    Refresh { at: u64 },
    DraftChanged(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Screen(Gesture),
    ScrollToTop,
    Fab(String),
    Backend(BackendUpdate),
}

#[derive(Debug, Default)]
pub struct PublicTab;

impl Scope for PublicTab {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "public-tab";

    fn init(&self) -> Reducer<State> {
        Reducer::init("init", State::default)
    }

    fn react(&mut self, input: Input, state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Backend(BackendUpdate::PublicUpdates(n)) => {
                sinks.reduce(Reducer::update("updates", move |prev: State| State {
                    num_of_updates: n,
                    ..prev
                }));
            }
            Input::Backend(BackendUpdate::Initialized) => {
                sinks.reduce(Reducer::update("initialized", |prev: State| State {
                    initialized_ssb: true,
                    ..prev
                }));
            }
            Input::Backend(_) => {}
            Input::Screen(Gesture::Refresh { at }) => {
                sinks.reduce(Reducer::update("refresh", move |prev: State| State {
                    num_of_updates: 0,
                    last_session_timestamp: Some(at),
                    ..prev
                }));
            }
            Input::Screen(Gesture::DraftChanged(has_draft)) => {
                sinks.reduce(Reducer::update("draft", move |prev: State| State {
                    has_compose_draft: has_draft,
                    ..prev
                }));
            }
            Input::ScrollToTop => {
                sinks.reduce(Reducer::update("scrollToTop", |prev: State| State {
                    scroll_to_top: prev.scroll_to_top.wrapping_add(1),
                    ..prev
                }));
            }
            Input::Fab(item) if item == "compose" && state.can_publish_ssb => {
                sinks.effect(Effect::Navigate(Command::Push(Screen::Compose)));
            }
            Input::Fab(item) => debug!(item = %item, "fab press ignored"),
        }
        sinks
    }

    fn render(&self, state: &State) -> View {
        View::new("public-tab")
            .prop("visible", state.is_visible)
            .prop("updates", state.num_of_updates)
            .prop("scroll_anchor", state.scroll_to_top)
            .prop("draft", state.has_compose_draft)
    }
}

pub fn fab(state: &State) -> Fab {
    Fab {
        visible: state.is_visible && state.can_publish_ssb,
        actions: vec!["compose"],
    }
}
