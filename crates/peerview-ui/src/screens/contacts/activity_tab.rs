//! Activity tab: recent follows, mentions and reactions involving us.

use peerview_core::backend::BackendUpdate;
use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::ids::FeedId;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::View;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub num_of_updates: u32,
    pub last_session_timestamp: Option<u64>,
    pub scroll_to_top: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Refresh { at: u64 },
    OpenProfile(FeedId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Screen(Gesture),
    ScrollToTop,
    Backend(BackendUpdate),
}

#[derive(Debug, Default)]
pub struct ActivityTab;

impl Scope for ActivityTab {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "activity-tab";

    fn init(&self) -> Reducer<State> {
        Reducer::init("init", State::default)
    }

    fn react(&mut self, input: Input, _state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Backend(BackendUpdate::ActivityUpdates(n)) => {
                sinks.reduce(Reducer::update("updates", move |prev: State| State {
                    num_of_updates: n,
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
            Input::Screen(Gesture::OpenProfile(id)) => {
                sinks.effect(Effect::Navigate(Command::Push(Screen::Profile(id))));
            }
            Input::ScrollToTop => {
                sinks.reduce(Reducer::update("scrollToTop", |prev: State| State {
                    scroll_to_top: prev.scroll_to_top.wrapping_add(1),
                    ..prev
                }));
            }
        }
        sinks
    }

    fn render(&self, state: &State) -> View {
        View::new("activity-tab")
            .prop("visible", state.is_visible)
            .prop("updates", state.num_of_updates)
            .prop("scroll_anchor", state.scroll_to_top)
    }
}
