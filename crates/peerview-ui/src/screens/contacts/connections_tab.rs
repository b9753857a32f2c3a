//! Connections tab: reachable peers and the network modes used to find them.

use peerview_core::backend::BackendUpdate;
use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::ids::{FeedId, Peer};
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::{Fab, View};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overall connectivity shown in the tab header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Every network mode is off.
    #[default]
    Bad,
    /// Looking for peers but none connected.
    Fair,
    Good,
}

/// Which empty-state or hint the tab shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    #[default]
    KnowsNoOne,
    KnowsSomeone,
    ConnectedPoorly,
    ConnectedWell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    pub initialized_ssb: bool,
    pub lan_enabled: bool,
    pub internet_enabled: bool,
    pub peers: Vec<Peer>,
    pub staged_peers: Vec<Peer>,
    pub status: Status,
    pub scenario: Scenario,
    pub scroll_to_top: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            is_visible: false,
            self_feed_id: FeedId::default(),
            self_avatar_url: None,
            initialized_ssb: false,
            lan_enabled: true,
            internet_enabled: true,
            peers: Vec::new(),
            staged_peers: Vec::new(),
            status: Status::Fair,
            scenario: Scenario::KnowsNoOne,
            scroll_to_top: 0,
        }
    }
}

impl State {
    fn connected(&self) -> usize {
        self.peers.iter().filter(|p| p.connected).count()
    }

    /// Recomputes `status` and `scenario` from the fields they derive from.
    fn derive(mut self) -> Self {
        let connected = self.connected();
        self.status = if !self.lan_enabled && !self.internet_enabled {
            Status::Bad
        } else if connected == 0 {
            Status::Fair
        } else {
            Status::Good
        };
        self.scenario = match connected {
            0 if self.peers.is_empty() && self.staged_peers.is_empty() => Scenario::KnowsNoOne,
            0 => Scenario::KnowsSomeone,
            1 | 2 => Scenario::ConnectedPoorly,
            _ => Scenario::ConnectedWell,
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    ToggleLan,
    ToggleInternet,
    OpenPeer(FeedId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Screen(Gesture),
    ScrollToTop,
    Fab(String),
    Backend(BackendUpdate),
}

#[derive(Debug, Default)]
pub struct ConnectionsTab;

impl Scope for ConnectionsTab {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "connections-tab";

    fn init(&self) -> Reducer<State> {
        Reducer::init("init", State::default)
    }

    fn react(&mut self, input: Input, _state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Backend(BackendUpdate::Peers(peers)) => {
                sinks.reduce(Reducer::update("peers", move |prev: State| {
                    State { peers, ..prev }.derive()
                }));
            }
            Input::Backend(BackendUpdate::StagedPeers(staged_peers)) => {
                sinks.reduce(Reducer::update("stagedPeers", move |prev: State| {
                    State {
                        staged_peers,
                        ..prev
                    }
                    .derive()
                }));
            }
            Input::Backend(_) => {}
            Input::Screen(Gesture::ToggleLan) => {
                sinks.reduce(Reducer::update("toggleLan", |prev: State| {
                    State {
                        lan_enabled: !prev.lan_enabled,
                        ..prev
                    }
                    .derive()
                }));
            }
            Input::Screen(Gesture::ToggleInternet) => {
                sinks.reduce(Reducer::update("toggleInternet", |prev: State| {
                    State {
                        internet_enabled: !prev.internet_enabled,
                        ..prev
                    }
                    .derive()
                }));
            }
            Input::Screen(Gesture::OpenPeer(id)) => {
                sinks.effect(Effect::Navigate(Command::Push(Screen::Profile(id))));
            }
            Input::ScrollToTop => {
                sinks.reduce(Reducer::update("scrollToTop", |prev: State| State {
                    scroll_to_top: prev.scroll_to_top.wrapping_add(1),
                    ..prev
                }));
            }
            Input::Fab(item) => match item.as_str() {
                "invite-paste" => {
                    sinks.effect(Effect::Navigate(Command::Push(Screen::PasteInvite)));
                }
                "invite-create" => {
                    sinks.effect(Effect::Navigate(Command::Push(Screen::CreateInvite)));
                }
                _ => debug!(item = %item, "fab press ignored"),
            },
        }
        sinks
    }

    fn render(&self, state: &State) -> View {
        View::new("connections-tab")
            .prop("visible", state.is_visible)
            .prop("status", serde_json_name(state.status))
            .prop("scenario", serde_json_name(state.scenario))
            .prop("peers", state.peers.len())
            .prop("staged", state.staged_peers.len())
            .prop("scroll_anchor", state.scroll_to_top)
    }
}

fn serde_json_name(value: impl Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

pub fn fab(state: &State) -> Fab {
    Fab {
        visible: state.is_visible && state.initialized_ssb,
        actions: vec!["invite-paste", "invite-create"],
    }
}
