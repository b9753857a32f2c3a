//! Private conversations tab.

use std::collections::BTreeSet;

use peerview_core::backend::BackendUpdate;
use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::ids::{FeedId, MsgId};
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
    /// Conversations with unread activity, by root message.
    pub updates: BTreeSet<MsgId>,
    pub conversations_open: BTreeSet<MsgId>,
    pub scroll_to_top: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    OpenConversation(MsgId),
    CloseConversation(MsgId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Screen(Gesture),
    ScrollToTop,
    Fab(String),
    Backend(BackendUpdate),
}

#[derive(Debug, Default)]
pub struct PrivateTab;

impl Scope for PrivateTab {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "private-tab";

    fn init(&self) -> Reducer<State> {
        Reducer::init("init", State::default)
    }

    fn react(&mut self, input: Input, _state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Backend(BackendUpdate::PrivateUpdate(root)) => {
                sinks.reduce(Reducer::update("update", move |mut prev: State| {
                    // An open conversation is being read right now.
                    if !prev.conversations_open.contains(&root) {
                        prev.updates.insert(root);
                    }
                    prev
                }));
            }
            Input::Backend(_) => {}
            Input::Screen(Gesture::OpenConversation(root)) => {
                sinks.effect(Effect::Navigate(Command::Push(Screen::Conversation(
                    root.clone(),
                ))));
                sinks.reduce(Reducer::update("openConversation", move |mut prev: State| {
                    prev.updates.remove(&root);
                    prev.conversations_open.insert(root);
                    prev
                }));
            }
            Input::Screen(Gesture::CloseConversation(root)) => {
                sinks.reduce(Reducer::update("closeConversation", move |mut prev: State| {
                    prev.conversations_open.remove(&root);
                    prev
                }));
            }
            Input::ScrollToTop => {
                sinks.reduce(Reducer::update("scrollToTop", |prev: State| State {
                    scroll_to_top: prev.scroll_to_top.wrapping_add(1),
                    ..prev
                }));
            }
            Input::Fab(item) if item == "new-conversation" => {
                sinks.effect(Effect::Navigate(Command::Push(Screen::NewConversation)));
            }
            Input::Fab(item) => debug!(item = %item, "fab press ignored"),
        }
        sinks
    }

    fn render(&self, state: &State) -> View {
        View::new("private-tab")
            .prop("visible", state.is_visible)
            .prop("unread", state.updates.len())
            .prop("scroll_anchor", state.scroll_to_top)
    }
}

pub fn fab(state: &State) -> Fab {
    Fab {
        visible: state.is_visible,
        actions: vec!["new-conversation"],
    }
}
