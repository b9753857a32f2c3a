//! Desktop frame: side rail, profile header and app menu.
//!
//! Runs in its own runtime next to the content screen. The two share nothing
//! but the bus: a rail press is announced as `contentScreenUpdate/changeTab`,
//! and the rail only highlights a tab once that event comes back.

mod intent;
pub mod model;
mod navigation;
mod view;

pub use intent::{Action, Gesture};
pub use model::{FrameOptions, State, is_newer};

use peerview_core::backend::{BackendUpdate, Topic};
use peerview_core::bus::EventFilter;
use peerview_core::effects::Effect;
use peerview_core::events::{EventKind, GlobalEvent};
use peerview_core::merge::DropRepeats;
use peerview_core::reducer::Reducer;
use peerview_core::scope::{Scope, Sinks};
use peerview_core::view::View;
use tracing::{debug, info};

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
pub struct DesktopFrame {
    options: FrameOptions,
    about_requested: bool,
    version_feed_opened: bool,
    allow_checking: DropRepeats<bool>,
    has_new_version: DropRepeats<bool>,
}

impl DesktopFrame {
    pub fn new(options: FrameOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    fn apply(&self, action: Action, state: &State, sinks: &mut Sinks<State>) {
        debug!(scope = Self::NAME, action = ?action, "action");
        if let Some(reducer) = model::reducer(&action) {
            sinks.reduce(reducer);
        }
        if let Some(effect) = navigation::effects(action, state, &self.options) {
            sinks.effect(effect);
        }
    }
}

impl Scope for DesktopFrame {
    type State = State;
    type Input = Input;
    const NAME: &'static str = "desktop-frame";

    fn bus_filter(&self) -> EventFilter {
        EventFilter::kinds([
            EventKind::ContentScreenUpdate,
            EventKind::LocalizationLoaded,
            EventKind::ApproveCheckingNewVersion,
        ])
    }

    fn topics(&self) -> Vec<Topic> {
        vec![
            Topic::SelfFeedId,
            Topic::MigrationProgress,
            Topic::IndexingProgress,
            Topic::Settings,
        ]
    }

    fn init(&self) -> Reducer<State> {
        model::init()
    }

    fn react(&mut self, input: Input, state: &State) -> Sinks<State> {
        let mut sinks = Sinks::new();
        match input {
            Input::Screen(gesture) => {
                self.apply(intent::from_gesture(state, gesture), state, &mut sinks);
            }
            Input::Bus(event) => {
                if let Some(action) = intent::from_event(&event) {
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
                if let Some(reducer) = model::backend_reducer(&update, &self.options) {
                    sinks.reduce(reducer);
                }
            }
        }
        sinks
    }

    fn observe(&mut self, state: &State) -> Vec<Effect> {
        let mut effects = Vec::new();
        let allowed = self.allow_checking.observe(state.allow_checking_new_version) == Some(true);
        if allowed && !self.version_feed_opened {
            self.version_feed_opened = true;
            effects.push(Effect::Open(Topic::LatestVersion));
        }
        if self.has_new_version.observe(state.has_new_version) == Some(true) {
            info!(current = %self.options.version, "new version available");
            effects.push(Effect::Dispatch(GlobalEvent::HasNewVersion));
        }
        effects
    }

    fn render(&self, state: &State) -> View {
        view::render(state)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use peerview_core::backend::{Backend, ChannelBackend};
    use peerview_core::bus::EventBus;
    use peerview_core::effects::{Command, Screen};
    use peerview_core::events::{ContentScreenUpdate, ContentTab};
    use peerview_core::ids::{FeedId, Settings};
    use peerview_core::runtime::Runtime;

    use super::*;

    fn mount() -> (Runtime<DesktopFrame>, EventBus, Rc<ChannelBackend>) {
        let bus = EventBus::new();
        let backend = Rc::new(ChannelBackend::new());
        let options = FrameOptions {
            version: "0.9.0".into(),
            ..FrameOptions::default()
        };
        let mut runtime = Runtime::mount(
            DesktopFrame::new(options),
            &bus,
            Rc::clone(&backend) as Rc<dyn Backend>,
        );
        bus.attach();
        runtime.settle();
        (runtime, bus, backend)
    }

    #[test]
    fn test_rail_follows_bus_not_press() {
        let (mut runtime, bus, _backend) = mount();
        let mut tap = bus.subscribe(EventFilter::all());

        runtime.send(Gesture::Tab(ContentTab::Contacts));
        runtime.tick();
        assert_eq!(runtime.state().unwrap().current_tab, ContentTab::Home);
        assert_eq!(
            tap.drain(),
            vec![GlobalEvent::from(ContentScreenUpdate::ChangeTab {
                tab: ContentTab::Contacts
            })]
        );

        runtime.settle();
        assert_eq!(runtime.state().unwrap().current_tab, ContentTab::Contacts);
    }

    #[test]
    fn test_badges_track_counters() {
        let (mut runtime, bus, _backend) = mount();
        bus.dispatch(ContentScreenUpdate::MessagesUpdates { counter: 5 }.into());
        runtime.settle();
        assert_eq!(runtime.state().unwrap().badges[ContentTab::Messages], 5);

        let view = runtime.render();
        let rail = view.find("side-rail").unwrap();
        assert_eq!(rail.children[0].children[1].get_prop("badge"), Some("5"));
    }

    #[test]
    fn test_version_check_needs_approval() {
        let (mut runtime, bus, backend) = mount();
        backend.push(BackendUpdate::Settings(Settings {
            allow_checking_new_version: false,
        }));
        runtime.settle();
        assert_eq!(backend.open_feeds(&Topic::LatestVersion), 0);

        let mut tap = bus.subscribe(EventFilter::kinds([EventKind::HasNewVersion]));
        bus.dispatch(GlobalEvent::ApproveCheckingNewVersion);
        runtime.settle();
        assert_eq!(backend.open_feeds(&Topic::LatestVersion), 1);

        backend.push(BackendUpdate::LatestVersion("0.10.0".into()));
        runtime.settle();
        backend.push(BackendUpdate::LatestVersion("0.11.0".into()));
        runtime.settle();

        assert!(runtime.state().unwrap().has_new_version);
        assert_eq!(tap.drain(), vec![GlobalEvent::HasNewVersion]);
    }

    #[test]
    fn test_older_version_is_not_announced() {
        let (mut runtime, _bus, backend) = mount();
        backend.push(BackendUpdate::Settings(Settings {
            allow_checking_new_version: true,
        }));
        runtime.settle();
        backend.push(BackendUpdate::LatestVersion("0.8.9".into()));
        runtime.settle();
        assert!(!runtime.state().unwrap().has_new_version);
    }

    #[test]
    fn test_menu_commands_and_links() {
        let (mut runtime, _bus, backend) = mount();
        backend.push(BackendUpdate::SelfFeedId(FeedId::new("@me")));
        runtime.settle();

        runtime.send(Gesture::SelfProfile);
        runtime.send(Gesture::Settings);
        runtime.send(Gesture::BugReport);
        runtime.send(Gesture::Download);
        runtime.settle();

        let outbox = runtime.take_outbox();
        assert_eq!(
            outbox.commands,
            vec![
                Command::Push(Screen::Profile(FeedId::new("@me"))),
                Command::Push(Screen::Settings),
            ]
        );
        assert_eq!(
            outbox.links,
            vec![
                "mailto:contact@staltz.com".to_string(),
                "https://www.manyver.se/download".to_string(),
            ]
        );
    }
}
