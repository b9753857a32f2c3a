//! Scripted sessions.
//!
//! A script is JSON lines, one step per line. Blank lines and lines starting
//! with `#` are skipped. The session settles the app after every step and
//! stops early once a screen asks to exit.
//!
//! ```text
//! {"backend": {"self_feed_id": "@me"}}
//! {"frame": {"tab": "contacts"}}
//! {"bus": {"type": "contactScreenUpdate", "subtype": "changeTab", "tab": "connections"}}
//! {"fail": {"topic": "latest_version", "reason": "timeout"}}
//! {"wait": 100}
//! ```

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use peerview_core::backend::{Backend, BackendError, BackendUpdate, ChannelBackend, Topic};
use peerview_core::bus::{EventFilter, Subscription};
use peerview_core::config::Config;
use peerview_core::effects::Command;
use peerview_core::events::GlobalEvent;
use peerview_core::view::View;
use peerview_ui::app::App;
use peerview_ui::screens::{content, desktop_frame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Dispatch on the global bus, as an outside host would.
    Bus(GlobalEvent),
    /// Push an item to every open feed of its topic.
    Backend(BackendUpdate),
    /// Push an error item; the feed is reopened by its runtime.
    Fail(Failure),
    Frame(desktop_frame::Gesture),
    Content(content::Gesture),
    /// Milliseconds to sleep before settling.
    Wait(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Failure {
    pub topic: Topic,
    pub reason: String,
}

/// Parses a script.
///
/// # Errors
/// Returns an error naming the first line that is not a valid step.
pub fn parse(text: &str) -> Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid step on line {n}"))
        })
        .collect()
}

/// What a session observed.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Steps run before the session ended.
    pub steps: usize,
    /// Every bus event dispatched after mount, in order.
    pub events: Vec<GlobalEvent>,
    pub commands: Vec<Command>,
    pub links: Vec<String>,
    pub exit: bool,
    pub frame: Option<desktop_frame::State>,
    pub content: Option<content::State>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
}

pub struct Session {
    app: App,
    backend: Rc<ChannelBackend>,
    tap: Subscription,
    events: Vec<GlobalEvent>,
    commands: Vec<Command>,
    links: Vec<String>,
    steps: usize,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let backend = Rc::new(ChannelBackend::new());
        let app = App::new(config, Rc::clone(&backend) as Rc<dyn Backend>);
        let tap = app.bus().subscribe(EventFilter::all());
        let mut session = Self {
            app,
            backend,
            tap,
            events: Vec::new(),
            commands: Vec::new(),
            links: Vec::new(),
            steps: 0,
        };
        session.settle();
        session
    }

    /// Runs `steps` in order. Remaining steps are skipped after an exit.
    pub async fn play(&mut self, steps: Vec<Step>) {
        let total = steps.len();
        for step in steps {
            if self.app.exit_requested() {
                info!(skipped = total - self.steps, "exit requested; stopping script");
                break;
            }
            self.apply(step).await;
            self.steps += 1;
        }
    }

    async fn apply(&mut self, step: Step) {
        debug!(step = ?step, "script step");
        match step {
            Step::Bus(event) => {
                self.app.bus().dispatch(event);
            }
            Step::Backend(update) => {
                let topic = update.topic();
                let reached = self.backend.push(update);
                debug!(topic = %topic, reached, "backend item pushed");
            }
            Step::Fail(Failure { topic, reason }) => {
                let reached = self.backend.fail(&topic, BackendError::Request(reason));
                debug!(topic = %topic, reached, "backend failure pushed");
            }
            Step::Frame(gesture) => self.app.press_frame(gesture),
            Step::Content(gesture) => self.app.press_content(gesture),
            Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
        self.settle();
    }

    fn settle(&mut self) {
        self.app.run_until_idle();
        self.events.extend(self.tap.drain());
        let outbox = self.app.take_outbox();
        self.commands.extend(outbox.commands);
        self.links.extend(outbox.links);
    }

    pub fn finish(self, render: bool) -> Report {
        let view = render.then(|| self.app.render());
        Report {
            steps: self.steps,
            events: self.events,
            commands: self.commands,
            links: self.links,
            exit: self.app.exit_requested(),
            frame: self.app.frame_state().cloned(),
            content: self.app.content_state().cloned(),
            view,
        }
    }
}
