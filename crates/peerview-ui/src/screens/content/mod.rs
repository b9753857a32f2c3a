//! Content screen: the top-level tabs of the mobile layout.
//!
//! Embeds the messages and contacts screens through lenses. Everything that
//! changes the current tab goes through the bus so that the desktop frame,
//! which runs in its own runtime, sees the same sequence of tab changes.
//!
//! ## Routing
//!
//! - `messageScreenUpdate` / `contactScreenUpdate` go to the matching child.
//! - Central-screen back and drawer events go to both children; only the
//!   visible one answers.
//! - Everything else in the filter is handled here (see [`intent`]).

mod intent;
pub mod model;
mod navigation;
mod view;

pub use intent::Action;
pub use model::{ContactsScreenLens, MessagesScreenLens, State};

use peerview_core::backend::{BackendUpdate, Topic};
use peerview_core::bus::EventFilter;
use peerview_core::effects::Effect;
use peerview_core::events::{ContentScreenUpdate, ContentTab, EventKind, GlobalEvent};
use peerview_core::lens::Lens;
use peerview_core::merge::DropRepeats;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::View;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::contacts::{self, ContactsScreen};
use super::messages::{self, MessagesScreen};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Tab(ContentTab),
    Messages(messages::Gesture),
    Contacts(contacts::Gesture),
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
pub struct ContentScreen {
    messages: MessagesScreen,
    contacts: ContactsScreen,
    about_requested: bool,
    messages_updates: DropRepeats<u32>,
    contacts_updates: DropRepeats<u32>,
}

impl ContentScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn react_messages(&mut self, input: messages::Input, state: &State) -> Sinks<State> {
        let child = self
            .messages
            .react(input, &MessagesScreenLens.get(state))
            .lift(MessagesScreenLens);
        if state.current_tab == ContentTab::Messages {
            child
        } else {
            child.without_navigation()
        }
    }

    fn react_contacts(&mut self, input: contacts::Input, state: &State) -> Sinks<State> {
        let child = self
            .contacts
            .react(input, &ContactsScreenLens.get(state))
            .lift(ContactsScreenLens);
        if state.current_tab == ContentTab::Contacts {
            child
        } else {
            child.without_navigation()
        }
    }

    fn apply(action: &Action, state: &State, sinks: &mut Sinks<State>) {
        debug!(scope = Self::NAME, action = ?action, "action");
        if let Some(reducer) = model::reducer(action) {
            sinks.reduce(reducer);
        }
        if let Some(effect) = navigation::effects(action, state) {
            sinks.effect(effect);
        }
    }
}

impl Scope for ContentScreen {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "content";

    fn bus_filter(&self) -> EventFilter {
        EventFilter::kinds([
            EventKind::ContentScreenUpdate,
            EventKind::HardwareBackOnContentScreen,
            EventKind::DrawerToggleOnContentScreen,
            EventKind::TriggerFeedCypherlink,
            EventKind::TriggerMsgCypherlink,
            EventKind::TriggerHashtagLink,
        ])
        .union(&self.messages.bus_filter())
        .union(&self.contacts.bus_filter())
    }

    fn topics(&self) -> Vec<Topic> {
        vec![
            Topic::SelfFeedId,
            Topic::Initialized,
            Topic::MigrationProgress,
            Topic::IndexingProgress,
            Topic::PublicUpdates,
            Topic::PrivateUpdates,
            Topic::ActivityUpdates,
            Topic::Peers,
            Topic::StagedPeers,
        ]
    }

    fn init(&self) -> Reducer<State> {
        model::init()
            .then(self.messages.init().lift(MessagesScreenLens))
            .then(self.contacts.init().lift(ContactsScreenLens))
    }

    fn react(&mut self, input: Input, state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Screen(Gesture::Tab(tab)) => {
                Self::apply(&intent::tab_pressed(state, tab), state, &mut sinks);
            }
            Input::Screen(Gesture::Messages(gesture)) => {
                sinks.extend(self.react_messages(messages::Input::Screen(gesture), state));
            }
            Input::Screen(Gesture::Contacts(gesture)) => {
                sinks.extend(self.react_contacts(contacts::Input::Screen(gesture), state));
            }
            Input::Bus(event) => match event.kind() {
                EventKind::MessageScreenUpdate => {
                    sinks.extend(self.react_messages(messages::Input::Bus(event), state));
                }
                EventKind::ContactScreenUpdate => {
                    sinks.extend(self.react_contacts(contacts::Input::Bus(event), state));
                }
                EventKind::HardwareBackOnCentralScreen | EventKind::DrawerToggleOnCentralScreen => {
                    sinks.extend(self.react_messages(messages::Input::Bus(event.clone()), state));
                    sinks.extend(self.react_contacts(contacts::Input::Bus(event), state));
                }
                _ => {
                    if let Some(action) = intent::from_event(state, &event) {
                        Self::apply(&action, state, &mut sinks);
                    }
                }
            },
            Input::Backend(update) => {
                if let Some(reducer) = model::backend_reducer(&update) {
                    sinks.reduce(reducer);
                }
                match update {
                    // Identity is mirrored into the children by the lenses.
                    BackendUpdate::SelfFeedId(id) => {
                        if !self.about_requested {
                            self.about_requested = true;
                            sinks.effect(Effect::Open(Topic::ProfileAbout(id)));
                        }
                    }
                    BackendUpdate::About(_) => {}
                    update => {
                        sinks.extend(
                            self.react_messages(messages::Input::Backend(update.clone()), state),
                        );
                        sinks.extend(self.react_contacts(contacts::Input::Backend(update), state));
                    }
                }
            }
        }
        sinks
    }

    fn observe(&mut self, state: &State) -> Vec<Effect> {
        let mut effects = self.messages.observe(&MessagesScreenLens.get(state));
        effects.extend(self.contacts.observe(&ContactsScreenLens.get(state)));
        if let Some(counter) = self.messages_updates.observe(state.num_of_messages_updates) {
            effects.push(Effect::Dispatch(
                ContentScreenUpdate::MessagesUpdates { counter }.into(),
            ));
        }
        if let Some(counter) = self.contacts_updates.observe(state.num_of_contacts_updates) {
            effects.push(Effect::Dispatch(
                ContentScreenUpdate::ContactsUpdates { counter }.into(),
            ));
        }
        effects
    }

    fn render(&self, state: &State) -> View {
        view::render(
            state,
            self.messages.render(&MessagesScreenLens.get(state)),
            self.contacts.render(&ContactsScreenLens.get(state)),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use peerview_core::backend::{Backend, ChannelBackend};
    use peerview_core::bus::EventBus;
    use peerview_core::effects::{Command, Screen};
    use peerview_core::events::{ContactScreenUpdate, ContactsTab, MessageScreenUpdate};
    use peerview_core::ids::FeedId;
    use peerview_core::runtime::Runtime;

    use super::*;
    use crate::screens::contacts::ConnectionsTabLens;
    use crate::screens::messages::PublicTabLens;

    fn mount() -> (Runtime<ContentScreen>, EventBus, Rc<ChannelBackend>) {
        let bus = EventBus::new();
        let backend = Rc::new(ChannelBackend::new());
        let mut runtime = Runtime::mount(
            ContentScreen::new(),
            &bus,
            Rc::clone(&backend) as Rc<dyn Backend>,
        );
        bus.attach();
        runtime.settle();
        (runtime, bus, backend)
    }

    fn state(runtime: &Runtime<ContentScreen>) -> &State {
        runtime.state().unwrap()
    }

    #[test]
    fn test_tab_press_round_trips_through_bus() {
        let (mut runtime, bus, _backend) = mount();
        let mut tap = bus.subscribe(EventFilter::kinds([EventKind::ContentScreenUpdate]));

        runtime.send(Gesture::Tab(ContentTab::Messages));
        runtime.settle();

        assert_eq!(state(&runtime).current_tab, ContentTab::Messages);
        assert_eq!(
            tap.drain(),
            vec![GlobalEvent::from(ContentScreenUpdate::ChangeTab {
                tab: ContentTab::Messages
            })]
        );
        assert!(MessagesScreenLens.get(state(&runtime)).is_visible);
    }

    #[test]
    fn test_reselect_scrolls_nested_public_tab() {
        let (mut runtime, _bus, _backend) = mount();
        runtime.send(Gesture::Tab(ContentTab::Messages));
        runtime.settle();
        runtime.send(Gesture::Tab(ContentTab::Messages));
        runtime.settle();

        let messages = MessagesScreenLens.get(state(&runtime));
        assert_eq!(PublicTabLens.get(&messages).scroll_to_top, 1);
    }

    #[test]
    fn test_bus_scroll_names_current_sub_tab() {
        let (mut runtime, bus, _backend) = mount();
        bus.dispatch(ContentScreenUpdate::ChangeTab { tab: ContentTab::Contacts }.into());
        runtime.send(Gesture::Contacts(contacts::Gesture::ConnectionsTabButton));
        runtime.settle();

        let mut tap = bus.subscribe(EventFilter::kinds([EventKind::ContactScreenUpdate]));
        bus.dispatch(ContentScreenUpdate::ScrollToTop { tab: ContentTab::Contacts }.into());
        runtime.settle();

        assert!(tap.drain().contains(&GlobalEvent::from(
            ContactScreenUpdate::ScrollToTop {
                tab: ContactsTab::Connections
            }
        )));
        let contacts = ContactsScreenLens.get(state(&runtime));
        assert_eq!(ConnectionsTabLens.get(&contacts).scroll_to_top, 1);
    }

    #[test]
    fn test_back_is_delegated_to_visible_child() {
        let (mut runtime, bus, _backend) = mount();
        bus.dispatch(ContentScreenUpdate::ChangeTab { tab: ContentTab::Contacts }.into());
        runtime.send(Gesture::Contacts(contacts::Gesture::ConnectionsTabButton));
        runtime.settle();

        bus.dispatch(GlobalEvent::HardwareBackOnContentScreen);
        runtime.settle();
        let contacts = ContactsScreenLens.get(state(&runtime));
        assert_eq!(contacts.current_tab, ContactsTab::Activity);
        assert!(!runtime.exit_requested());

        bus.dispatch(GlobalEvent::HardwareBackOnContentScreen);
        runtime.settle();
        assert!(runtime.exit_requested());
    }

    #[test]
    fn test_back_on_other_tab_returns_home() {
        let (mut runtime, bus, _backend) = mount();
        bus.dispatch(ContentScreenUpdate::ChangeTab { tab: ContentTab::Discover }.into());
        runtime.settle();

        bus.dispatch(GlobalEvent::HardwareBackOnContentScreen);
        runtime.settle();
        assert_eq!(state(&runtime).current_tab, ContentTab::Home);
        assert!(!runtime.exit_requested());
    }

    #[test]
    fn test_counters_aggregate_and_relay() {
        let (mut runtime, bus, backend) = mount();
        let mut tap = bus.subscribe(EventFilter::all());

        backend.push(BackendUpdate::PublicUpdates(2));
        backend.push(BackendUpdate::ActivityUpdates(3));
        runtime.settle();

        let events = tap.drain();
        assert!(events.contains(&GlobalEvent::from(MessageScreenUpdate::PublicUpdates {
            counter: 2
        })));
        assert!(events.contains(&GlobalEvent::from(
            ContentScreenUpdate::MessagesUpdates { counter: 2 }
        )));
        assert!(events.contains(&GlobalEvent::from(
            ContentScreenUpdate::ContactsUpdates { counter: 3 }
        )));
        assert_eq!(state(&runtime).num_of_messages_updates, 2);
    }

    #[test]
    fn test_cypherlink_pushes_profile() {
        let (mut runtime, bus, _backend) = mount();
        bus.dispatch(GlobalEvent::TriggerFeedCypherlink {
            feed_id: FeedId::new("@bob"),
        });
        runtime.settle();
        assert_eq!(
            runtime.take_outbox().commands,
            vec![Command::Push(Screen::Profile(FeedId::new("@bob")))]
        );
    }

    #[test]
    fn test_hidden_child_navigation_is_dropped() {
        let (mut runtime, _bus, _backend) = mount();
        runtime.send(Gesture::Messages(messages::Gesture::Fab("compose".into())));
        runtime.settle();
        assert!(runtime.take_outbox().commands.is_empty());

        runtime.send(Gesture::Tab(ContentTab::Messages));
        runtime.settle();
        runtime.send(Gesture::Messages(messages::Gesture::Fab("compose".into())));
        runtime.settle();
        assert_eq!(
            runtime.take_outbox().commands,
            vec![Command::Push(Screen::Compose)]
        );
    }

    #[test]
    fn test_mount_initializes_every_nested_tab() {
        let (runtime, _bus, _backend) = mount();
        let messages = state(&runtime).messages_tab.as_ref().unwrap();
        let contacts = state(&runtime).contacts_tab.as_ref().unwrap();
        assert!(messages.public_tab.is_some());
        assert!(messages.private_tab.is_some());
        assert!(contacts.activity_tab.is_some());
        assert!(contacts.connections_tab.is_some());
    }
}
