//! Messages screen: public feed and private conversations.
//!
//! Owns the public/private tab bar and embeds both tabs through lenses. The
//! unread counters of the two tabs are folded back into this state and
//! announced on the bus as `messageScreenUpdate` events whenever they change.

mod intent;
pub mod model;
mod navigation;
pub mod private_tab;
pub mod public_tab;
mod view;

pub use intent::Action;
pub use model::{PrivateTabLens, PublicTabLens, State};

use peerview_core::backend::{BackendUpdate, Topic};
use peerview_core::bus::EventFilter;
use peerview_core::effects::Effect;
use peerview_core::events::{EventKind, GlobalEvent, MessageScreenUpdate, MessagesTab};
use peerview_core::lens::Lens;
use peerview_core::merge::DropRepeats;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::{Fab, View};
use serde::{Deserialize, Serialize};
use tracing::debug;

use private_tab::PrivateTab;
use public_tab::PublicTab;

/// Gestures on the messages screen or one of its tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    PublicTabButton,
    PrivateTabButton,
    /// Fab item pressed on the current tab.
    Fab(String),
    Public(public_tab::Gesture),
    Private(private_tab::Gesture),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Screen(Gesture),
    Bus(GlobalEvent),
    Backend(BackendUpdate),
}

impl From<Gesture> for Input {
    fn from(gesture: Gesture) -> Self {
        Self::Screen(gesture)
    }
}

impl From<GlobalEvent> for Input {
    fn from(event: GlobalEvent) -> Self {
        Self::Bus(event)
    }
}

impl From<BackendUpdate> for Input {
    fn from(update: BackendUpdate) -> Self {
        Self::Backend(update)
    }
}

#[derive(Debug, Default)]
pub struct MessagesScreen {
    public: PublicTab,
    private: PrivateTab,
    about_requested: bool,
    public_updates: DropRepeats<u32>,
    private_updates: DropRepeats<u32>,
}

impl MessagesScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn react_public(&mut self, input: public_tab::Input, state: &State) -> Sinks<State> {
        let child = self.public.react(input, &PublicTabLens.get(state)).lift(PublicTabLens);
        if state.current_tab == MessagesTab::Public {
            child
        } else {
            child.without_navigation()
        }
    }

    fn react_private(&mut self, input: private_tab::Input, state: &State) -> Sinks<State> {
        let child = self
            .private
            .react(input, &PrivateTabLens.get(state))
            .lift(PrivateTabLens);
        if state.current_tab == MessagesTab::Private {
            child
        } else {
            child.without_navigation()
        }
    }

    fn apply(&mut self, action: Action, state: &State, sinks: &mut Sinks<State>) {
        debug!(scope = Self::NAME, action = ?action, "action");
        match action {
            Action::ScrollToPublicTop => {
                sinks.extend(self.react_public(public_tab::Input::ScrollToTop, state));
            }
            Action::ScrollToPrivateTop => {
                sinks.extend(self.react_private(private_tab::Input::ScrollToTop, state));
            }
            _ => {}
        }
        if let Some(reducer) = model::reducer(action) {
            sinks.reduce(reducer);
        }
        if let Some(effect) = navigation::effects(action) {
            sinks.effect(effect);
        }
    }
}

impl Scope for MessagesScreen {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "messages";

    fn bus_filter(&self) -> EventFilter {
        EventFilter::kinds([
            EventKind::MessageScreenUpdate,
            EventKind::HardwareBackOnCentralScreen,
            EventKind::DrawerToggleOnCentralScreen,
        ])
    }

    fn topics(&self) -> Vec<Topic> {
        vec![
            Topic::SelfFeedId,
            Topic::MigrationProgress,
            Topic::IndexingProgress,
            Topic::Initialized,
            Topic::PublicUpdates,
            Topic::PrivateUpdates,
        ]
    }

    fn init(&self) -> Reducer<State> {
        model::init()
            .then(self.public.init().lift(PublicTabLens))
            .then(self.private.init().lift(PrivateTabLens))
    }

    fn react(&mut self, input: Input, state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Screen(Gesture::PublicTabButton) => {
                let action = intent::tab_pressed(state, MessagesTab::Public);
                self.apply(action, state, &mut sinks);
            }
            Input::Screen(Gesture::PrivateTabButton) => {
                let action = intent::tab_pressed(state, MessagesTab::Private);
                self.apply(action, state, &mut sinks);
            }
            Input::Screen(Gesture::Fab(item)) => match state.current_tab {
                MessagesTab::Public => {
                    sinks.extend(self.react_public(public_tab::Input::Fab(item), state));
                }
                MessagesTab::Private => {
                    sinks.extend(self.react_private(private_tab::Input::Fab(item), state));
                }
            },
            Input::Screen(Gesture::Public(gesture)) => {
                sinks.extend(self.react_public(public_tab::Input::Screen(gesture), state));
            }
            Input::Screen(Gesture::Private(gesture)) => {
                sinks.extend(self.react_private(private_tab::Input::Screen(gesture), state));
            }
            Input::Bus(event) => {
                if let Some(action) = intent::from_event(state, &event) {
                    self.apply(action, state, &mut sinks);
                }
            }
            Input::Backend(update) => {
                if let BackendUpdate::SelfFeedId(id) = &update
                    && !self.about_requested
                {
                    self.about_requested = true;
                    sinks.effect(Effect::Open(Topic::ProfileAbout(id.clone())));
                }
                if let Some(reducer) = model::backend_reducer(&update) {
                    sinks.reduce(reducer);
                }
                sinks.extend(self.react_public(public_tab::Input::Backend(update.clone()), state));
                sinks.extend(self.react_private(private_tab::Input::Backend(update), state));
            }
        }
        sinks
    }

    fn observe(&mut self, state: &State) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(counter) = self.public_updates.observe(state.num_of_public_updates) {
            effects.push(Effect::Dispatch(
                MessageScreenUpdate::PublicUpdates { counter }.into(),
            ));
        }
        if let Some(counter) = self.private_updates.observe(state.num_of_private_updates) {
            effects.push(Effect::Dispatch(
                MessageScreenUpdate::PrivateUpdates { counter }.into(),
            ));
        }
        effects
    }

    fn render(&self, state: &State) -> View {
        let public = PublicTabLens.get(state);
        let private = PrivateTabLens.get(state);
        let fab = match state.current_tab {
            MessagesTab::Public => public_tab::fab(&public),
            MessagesTab::Private => private_tab::fab(&private),
        };
        let fab = if state.is_visible { fab } else { Fab::hidden() };
        view::render(
            state,
            self.public.render(&public),
            self.private.render(&private),
            &fab,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use peerview_core::backend::{Backend, ChannelBackend};
    use peerview_core::bus::EventBus;
    use peerview_core::effects::{Command, Screen};
    use peerview_core::ids::{FeedId, MsgId};
    use peerview_core::runtime::Runtime;

    use super::*;

    fn mount() -> (Runtime<MessagesScreen>, EventBus, Rc<ChannelBackend>) {
        let bus = EventBus::new();
        let backend = Rc::new(ChannelBackend::new());
        let runtime = Runtime::mount(
            MessagesScreen::new(),
            &bus,
            Rc::clone(&backend) as Rc<dyn Backend>,
        );
        bus.attach();
        (runtime, bus, backend)
    }

    fn state(runtime: &Runtime<MessagesScreen>) -> &State {
        runtime.state().unwrap()
    }

    #[test]
    fn test_private_updates_fold_into_badge_and_bus() {
        let (mut runtime, bus, backend) = mount();
        let mut tap = bus.subscribe(EventFilter::kinds([EventKind::MessageScreenUpdate]));
        runtime.settle();

        backend.push(BackendUpdate::PrivateUpdate(MsgId::new("%a")));
        backend.push(BackendUpdate::PrivateUpdate(MsgId::new("%b")));
        backend.push(BackendUpdate::PrivateUpdate(MsgId::new("%a")));
        runtime.settle();

        assert_eq!(state(&runtime).num_of_private_updates, 2);
        let counters: Vec<_> = tap
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                GlobalEvent::MessageScreenUpdate(MessageScreenUpdate::PrivateUpdates {
                    counter,
                }) => Some(counter),
                _ => None,
            })
            .collect();
        assert_eq!(counters, vec![0, 1, 2]);
    }

    #[test]
    fn test_bus_change_tab_and_back() {
        let (mut runtime, bus, _backend) = mount();
        runtime.settle();

        bus.dispatch(
            MessageScreenUpdate::ChangeTab {
                tab: MessagesTab::Private,
            }
            .into(),
        );
        runtime.settle();
        assert_eq!(state(&runtime).current_tab, MessagesTab::Private);

        bus.dispatch(GlobalEvent::HardwareBackOnCentralScreen);
        runtime.settle();
        assert_eq!(state(&runtime).current_tab, MessagesTab::Public);

        bus.dispatch(GlobalEvent::HardwareBackOnCentralScreen);
        runtime.settle();
        assert!(runtime.exit_requested());
    }

    #[test]
    fn test_scroll_to_top_reaches_named_tab_only() {
        let (mut runtime, bus, _backend) = mount();
        runtime.settle();
        bus.dispatch(
            MessageScreenUpdate::ScrollToTop {
                tab: MessagesTab::Private,
            }
            .into(),
        );
        runtime.settle();

        let private = PrivateTabLens.get(state(&runtime));
        let public = PublicTabLens.get(state(&runtime));
        assert_eq!(private.scroll_to_top, 1);
        assert_eq!(public.scroll_to_top, 0);
    }

    #[test]
    fn test_fab_routes_to_current_tab() {
        let (mut runtime, _bus, _backend) = mount();
        runtime.send(Gesture::Fab("compose".into()));
        runtime.send(Gesture::PrivateTabButton);
        runtime.send(Gesture::Fab("compose".into()));
        runtime.send(Gesture::Fab("new-conversation".into()));
        runtime.settle();

        assert_eq!(
            runtime.take_outbox().commands,
            vec![
                Command::Push(Screen::Compose),
                Command::Push(Screen::NewConversation),
            ]
        );
    }

    #[test]
    fn test_hidden_tab_does_not_navigate() {
        let (mut runtime, _bus, _backend) = mount();
        runtime.send(Gesture::Private(private_tab::Gesture::OpenConversation(
            MsgId::new("%root"),
        )));
        runtime.settle();
        assert!(runtime.take_outbox().commands.is_empty());
    }

    #[test]
    fn test_self_feed_id_requests_about_once() {
        let (mut runtime, _bus, backend) = mount();
        runtime.settle();
        let me = FeedId::new("@me");
        backend.push(BackendUpdate::SelfFeedId(me.clone()));
        runtime.settle();
        backend.push(BackendUpdate::SelfFeedId(me.clone()));
        runtime.settle();

        assert_eq!(backend.open_feeds(&Topic::ProfileAbout(me.clone())), 1);
        backend.push(BackendUpdate::About(peerview_core::ids::About {
            id: me,
            name: None,
            image_url: Some("blob:avatar".into()),
        }));
        runtime.settle();
        assert_eq!(
            PublicTabLens.get(state(&runtime)).self_avatar_url.as_deref(),
            Some("blob:avatar")
        );
    }

    #[test]
    fn test_render_shows_active_fab_and_badges() {
        let (mut runtime, _bus, backend) = mount();
        runtime.settle();
        backend.push(BackendUpdate::PublicUpdates(3));
        runtime.settle();

        let view = runtime.render();
        let tabs = view.find("tab-bar").unwrap();
        assert_eq!(tabs.children[0].get_prop("badge"), Some("3"));
        assert_eq!(tabs.children[1].get_prop("badge"), None);
        assert_eq!(view.find("fab").unwrap().get_prop("actions"), Some("compose"));
    }

    #[test]
    fn test_mount_initializes_both_tabs() {
        let (mut runtime, _bus, _backend) = mount();
        runtime.settle();
        let state = state(&runtime);
        assert!(state.public_tab.is_some());
        assert!(state.private_tab.is_some());
        assert!(PublicTabLens.get(state).is_visible);
        assert!(!PrivateTabLens.get(state).is_visible);
    }

    #[test]
    fn test_refresh_then_new_updates_keeps_the_later_counter() {
        let (mut runtime, _bus, backend) = mount();
        runtime.settle();

        runtime.send(Gesture::Public(public_tab::Gesture::Refresh { at: 10 }));
        backend.push(BackendUpdate::PublicUpdates(3));
        runtime.settle();

        let state = state(&runtime);
        assert_eq!(state.num_of_public_updates, 3);
        assert_eq!(state.last_session_timestamp, Some(10));
    }
}
