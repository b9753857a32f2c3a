//! Contacts screen: activity feed and peer connections.

mod intent;
pub mod model;
mod navigation;
pub mod activity_tab;
pub mod connections_tab;
mod view;

pub use intent::Action;
pub use model::{ActivityTabLens, ConnectionsTabLens, State};

use peerview_core::backend::{BackendUpdate, Topic};
use peerview_core::bus::EventFilter;
use peerview_core::effects::Effect;
use peerview_core::events::{ContactScreenUpdate, ContactsTab, EventKind, GlobalEvent};
use peerview_core::lens::Lens;
use peerview_core::merge::DropRepeats;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::{Fab, View};
use serde::{Deserialize, Serialize};
use tracing::debug;

use activity_tab::ActivityTab;
use connections_tab::ConnectionsTab;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    ActivityTabButton,
    ConnectionsTabButton,
    Fab(String),
    Activity(activity_tab::Gesture),
    Connections(connections_tab::Gesture),
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
pub struct ContactsScreen {
    activity: ActivityTab,
    connections: ConnectionsTab,
    about_requested: bool,
    activity_updates: DropRepeats<u32>,
    connections_updates: DropRepeats<u32>,
}

impl ContactsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn react_activity(&mut self, input: activity_tab::Input, state: &State) -> Sinks<State> {
        let child = self
            .activity
            .react(input, &ActivityTabLens.get(state))
            .lift(ActivityTabLens);
        if state.current_tab == ContactsTab::Activity {
            child
        } else {
            child.without_navigation()
        }
    }

    fn react_connections(&mut self, input: connections_tab::Input, state: &State) -> Sinks<State> {
        let child = self
            .connections
            .react(input, &ConnectionsTabLens.get(state))
            .lift(ConnectionsTabLens);
        if state.current_tab == ContactsTab::Connections {
            child
        } else {
            child.without_navigation()
        }
    }

    fn apply(&mut self, action: Action, state: &State, sinks: &mut Sinks<State>) {
        debug!(scope = Self::NAME, action = ?action, "action");
        match action {
            Action::ScrollToActivityTop => {
                sinks.extend(self.react_activity(activity_tab::Input::ScrollToTop, state));
            }
            Action::ScrollToConnectionsTop => {
                sinks.extend(self.react_connections(connections_tab::Input::ScrollToTop, state));
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

impl Scope for ContactsScreen {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "contacts";

    fn bus_filter(&self) -> EventFilter {
        EventFilter::kinds([
            EventKind::ContactScreenUpdate,
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
            Topic::ActivityUpdates,
            Topic::Peers,
            Topic::StagedPeers,
        ]
    }

    fn init(&self) -> Reducer<State> {
        model::init()
            .then(self.activity.init().lift(ActivityTabLens))
            .then(self.connections.init().lift(ConnectionsTabLens))
    }

    fn react(&mut self, input: Input, state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Screen(Gesture::ActivityTabButton) => {
                let action = intent::tab_pressed(state, ContactsTab::Activity);
                self.apply(action, state, &mut sinks);
            }
            Input::Screen(Gesture::ConnectionsTabButton) => {
                let action = intent::tab_pressed(state, ContactsTab::Connections);
                self.apply(action, state, &mut sinks);
            }
            // Only the connections tab has a fab.
            Input::Screen(Gesture::Fab(item)) => {
                if state.current_tab == ContactsTab::Connections {
                    sinks.extend(
                        self.react_connections(connections_tab::Input::Fab(item), state),
                    );
                }
            }
            Input::Screen(Gesture::Activity(gesture)) => {
                sinks.extend(self.react_activity(activity_tab::Input::Screen(gesture), state));
            }
            Input::Screen(Gesture::Connections(gesture)) => {
                sinks.extend(
                    self.react_connections(connections_tab::Input::Screen(gesture), state),
                );
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
                sinks.extend(
                    self.react_activity(activity_tab::Input::Backend(update.clone()), state),
                );
                sinks.extend(
                    self.react_connections(connections_tab::Input::Backend(update), state),
                );
            }
        }
        sinks
    }

    fn observe(&mut self, state: &State) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(counter) = self.activity_updates.observe(state.num_of_activity_updates) {
            effects.push(Effect::Dispatch(
                ContactScreenUpdate::ActivityUpdates { counter }.into(),
            ));
        }
        let staged = ConnectionsTabLens.get(state).staged_peers.len() as u32;
        if let Some(counter) = self.connections_updates.observe(staged) {
            effects.push(Effect::Dispatch(
                ContactScreenUpdate::ConnectionsUpdates { counter }.into(),
            ));
        }
        effects
    }

    fn render(&self, state: &State) -> View {
        let activity = ActivityTabLens.get(state);
        let connections = ConnectionsTabLens.get(state);
        let fab = match state.current_tab {
            ContactsTab::Connections if state.is_visible => connections_tab::fab(&connections),
            _ => Fab::hidden(),
        };
        view::render(
            state,
            self.activity.render(&activity),
            self.connections.render(&connections),
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
    use peerview_core::ids::{FeedId, Peer};
    use peerview_core::runtime::Runtime;

    use super::*;

    fn mount() -> (Runtime<ContactsScreen>, EventBus, Rc<ChannelBackend>) {
        let bus = EventBus::new();
        let backend = Rc::new(ChannelBackend::new());
        let mut runtime = Runtime::mount(
            ContactsScreen::new(),
            &bus,
            Rc::clone(&backend) as Rc<dyn Backend>,
        );
        bus.attach();
        runtime.settle();
        (runtime, bus, backend)
    }

    fn change_tab(tab: ContactsTab) -> GlobalEvent {
        ContactScreenUpdate::ChangeTab { tab }.into()
    }

    #[test]
    fn test_bus_change_tab_then_reselect_scrolls() {
        let (mut runtime, bus, _backend) = mount();

        bus.dispatch(change_tab(ContactsTab::Connections));
        runtime.settle();
        let state = runtime.state().unwrap();
        assert_eq!(state.current_tab, ContactsTab::Connections);
        assert_eq!(ConnectionsTabLens.get(state).scroll_to_top, 0);

        bus.dispatch(change_tab(ContactsTab::Connections));
        runtime.settle();
        let state = runtime.state().unwrap();
        assert_eq!(state.current_tab, ContactsTab::Connections);
        assert_eq!(ConnectionsTabLens.get(state).scroll_to_top, 1);
        assert_eq!(ActivityTabLens.get(state).scroll_to_top, 0);
    }

    #[test]
    fn test_staged_peers_count_is_announced_once() {
        let (mut runtime, bus, backend) = mount();
        let mut tap = bus.subscribe(EventFilter::kinds([EventKind::ContactScreenUpdate]));
        let staged = vec![Peer {
            id: FeedId::new("@lan"),
            name: Some("lan peer".into()),
            connected: false,
        }];

        backend.push(BackendUpdate::StagedPeers(staged.clone()));
        backend.push(BackendUpdate::StagedPeers(staged));
        runtime.settle();

        assert_eq!(
            tap.drain(),
            vec![GlobalEvent::from(
                ContactScreenUpdate::ConnectionsUpdates { counter: 1 }
            )]
        );
    }

    #[test]
    fn test_fab_only_on_connections() {
        let (mut runtime, _bus, backend) = mount();
        backend.push(BackendUpdate::Initialized);
        runtime.send(Gesture::Fab("invite-paste".into()));
        runtime.settle();
        assert!(runtime.take_outbox().commands.is_empty());
        assert_eq!(
            runtime.render().find("fab").unwrap().get_prop("visible"),
            Some("false")
        );

        runtime.send(Gesture::ConnectionsTabButton);
        runtime.send(Gesture::Fab("invite-paste".into()));
        runtime.settle();
        assert_eq!(
            runtime.take_outbox().commands,
            vec![Command::Push(Screen::PasteInvite)]
        );
        assert_eq!(
            runtime.render().find("fab").unwrap().get_prop("visible"),
            Some("true")
        );
    }

    #[test]
    fn test_back_from_connections_returns_to_activity() {
        let (mut runtime, bus, _backend) = mount();
        runtime.send(Gesture::ConnectionsTabButton);
        runtime.settle();

        bus.dispatch(GlobalEvent::HardwareBackOnCentralScreen);
        runtime.settle();
        assert_eq!(runtime.state().unwrap().current_tab, ContactsTab::Activity);
        assert!(!runtime.exit_requested());
    }

    #[test]
    fn test_mount_initializes_both_tabs() {
        let (runtime, _bus, _backend) = mount();
        let state = runtime.state().unwrap();
        assert!(state.activity_tab.is_some());
        assert!(state.connections_tab.is_some());
    }

    #[test]
    fn test_progress_feeds_drive_banners() {
        let (mut runtime, _bus, backend) = mount();
        backend.push(BackendUpdate::MigrationProgress(0.5));
        backend.push(BackendUpdate::IndexingProgress(0.25));
        runtime.settle();

        let state = runtime.state().unwrap();
        assert!(!state.can_publish_ssb);
        let view = runtime.render();
        assert_eq!(
            view.find("migration-banner").unwrap().get_prop("progress"),
            Some("0.50")
        );
        assert_eq!(
            view.find("indexing-banner").unwrap().get_prop("progress"),
            Some("0.25")
        );

        backend.push(BackendUpdate::MigrationProgress(1.0));
        backend.push(BackendUpdate::IndexingProgress(1.0));
        runtime.settle();
        let view = runtime.render();
        assert!(view.find("migration-banner").is_none());
        assert!(view.find("indexing-banner").is_none());
    }
}
