//! Scope runtime - owns state, drains inputs, executes effects.
//!
//! This is the only place where side effects happen. A [`Runtime`] mounts one
//! root scope: it fans the scope's inputs into a [`Merge`], folds reducers
//! into a [`Store`], and executes the returned effects.
//!
//! ## Source order
//!
//! Sources are declared as `init`, the scope's backend topics (in the order
//! the scope lists them), `bus`, `screen`, then feeds opened on demand. A
//! batch is processed in arrival order across all of them; declaration order
//! only decides between items stamped by the same step.
//!
//! ## Scheduling
//!
//! Runtimes are single-threaded. Several runtimes sharing a bus are driven by
//! a [`Scheduler`], which ticks them round-robin until nothing moves.

use std::mem;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::backend::{Backend, BackendUpdate, Topic, resubscribing};
use crate::bus::EventBus;
use crate::effects::{Command, Effect};
use crate::events::GlobalEvent;
use crate::merge::{Merge, Pull, Stamped};
use crate::reducer::{Reducer, Store};
use crate::scope::Scope;
use crate::view::View;

/// One item of a runtime batch.
pub enum Step<S, I> {
    Reduce(Reducer<S>),
    Input(I),
}

/// Outputs for the host, drained with [`Runtime::take_outbox`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbox {
    pub commands: Vec<Command>,
    pub links: Vec<String>,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.links.is_empty()
    }

    pub fn append(&mut self, other: Outbox) {
        self.commands.extend(other.commands);
        self.links.extend(other.links);
    }
}

/// Runtime of one mounted scope.
pub struct Runtime<C: Scope> {
    scope: C,
    store: Store<C::State>,
    merge: Merge<Step<C::State, C::Input>>,
    bus: EventBus,
    backend: Rc<dyn Backend>,
    /// Sender for screen gestures; the receiver is the `screen` source.
    screen_tx: mpsc::UnboundedSender<Stamped<C::Input>>,
    outbox: Outbox,
    exit_requested: bool,
}

impl<C> Runtime<C>
where
    C: Scope + 'static,
    C::Input: From<GlobalEvent> + From<BackendUpdate> + 'static,
{
    /// Mounts `scope`: subscribes to the bus and opens its backend topics.
    pub fn mount(scope: C, bus: &EventBus, backend: Rc<dyn Backend>) -> Self {
        let mut merge = Merge::new();
        merge.add_items("init", [Step::Reduce(scope.init())]);
        for topic in scope.topics() {
            merge.add(topic.to_string(), backend_source::<C>(Rc::clone(&backend), topic));
        }

        let mut subscription = bus.subscribe(scope.bus_filter());
        merge.add("bus", move || {
            subscription
                .pull()
                .map(|stamped| stamped.map(|event| Step::Input(C::Input::from(event))))
        });

        let (screen_tx, screen_rx) = mpsc::unbounded_channel();
        merge.add_channel("screen", screen_rx, Step::Input);

        debug!(scope = C::NAME, sources = ?merge.source_names(), "scope mounted");
        Self {
            scope,
            store: Store::new(),
            merge,
            bus: bus.clone(),
            backend,
            screen_tx,
            outbox: Outbox::default(),
            exit_requested: false,
        }
    }

    /// Queues a screen gesture for the next tick.
    pub fn send(&self, input: impl Into<C::Input>) {
        if self.screen_tx.send(Stamped::now(input.into())).is_err() {
            warn!(scope = C::NAME, "screen source closed; gesture dropped");
        }
    }

    /// Drains one batch and processes it. Returns the number of steps.
    pub fn tick(&mut self) -> usize {
        let batch = self.merge.drain();
        let steps = batch.len();
        for step in batch {
            match step {
                Step::Reduce(reducer) => self.reduce(reducer),
                Step::Input(input) => self.handle(input),
            }
        }
        steps
    }

    /// Ticks until idle. For a runtime that is not sharing a scheduler.
    pub fn settle(&mut self) -> usize {
        let task: &mut dyn Task = self;
        Scheduler::default().run_until_idle(&mut [task])
    }

    pub fn state(&self) -> Option<&C::State> {
        self.store.current()
    }

    pub fn scope(&self) -> &C {
        &self.scope
    }

    pub fn render(&self) -> View {
        match self.store.current() {
            Some(state) => self.scope.render(state),
            None => View::placeholder(),
        }
    }

    pub fn take_outbox(&mut self) -> Outbox {
        mem::take(&mut self.outbox)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.merge.source_names()
    }

    fn handle(&mut self, input: C::Input) {
        let Some(state) = self.store.current() else {
            debug!(scope = C::NAME, "input before initial state; ignored");
            return;
        };
        let sinks = self.scope.react(input, state);
        for reducer in sinks.reducers {
            self.reduce(reducer);
        }
        self.execute(sinks.effects);
    }

    fn reduce(&mut self, reducer: Reducer<C::State>) {
        self.store.apply(reducer);
        if let Some(state) = self.store.current() {
            let effects = self.scope.observe(state);
            self.execute(effects);
        }
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Dispatch(event) => {
                    self.bus.dispatch(event);
                }
                Effect::Navigate(command) => {
                    debug!(scope = C::NAME, command = ?command, "navigation command");
                    self.outbox.commands.push(command);
                }
                Effect::Open(topic) => {
                    debug!(scope = C::NAME, topic = %topic, "opening backend feed");
                    self.merge.add(
                        topic.to_string(),
                        backend_source::<C>(Rc::clone(&self.backend), topic),
                    );
                }
                Effect::Link(url) => self.outbox.links.push(url),
                Effect::Exit => {
                    info!(scope = C::NAME, "exit requested");
                    self.exit_requested = true;
                }
            }
        }
    }
}

fn backend_source<C>(
    backend: Rc<dyn Backend>,
    topic: Topic,
) -> impl FnMut() -> Pull<Stamped<Step<C::State, C::Input>>> + 'static
where
    C: Scope + 'static,
    C::Input: From<BackendUpdate> + 'static,
{
    let mut pull = resubscribing(backend, topic);
    move || pull().map(|stamped| stamped.map(|update| Step::Input(C::Input::from(update))))
}

// ============================================================================
// Scheduler
// ============================================================================

/// Something the scheduler can tick.
pub trait Task {
    fn name(&self) -> &'static str;

    /// Processes one batch; returns how many steps it took.
    fn tick(&mut self) -> usize;
}

impl<C> Task for Runtime<C>
where
    C: Scope + 'static,
    C::Input: From<GlobalEvent> + From<BackendUpdate> + 'static,
{
    fn name(&self) -> &'static str {
        C::NAME
    }

    fn tick(&mut self) -> usize {
        Runtime::tick(self)
    }
}

/// Round-robin driver for runtimes sharing a bus.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    max_rounds: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ROUNDS)
    }
}

impl Scheduler {
    pub const DEFAULT_MAX_ROUNDS: usize = 64;

    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }

    /// Ticks `tasks` in order, round after round, until a round does no work.
    ///
    /// Gives up after `max_rounds` rounds; a tree that keeps producing work
    /// that long is feeding events back to itself.
    pub fn run_until_idle(&self, tasks: &mut [&mut dyn Task]) -> usize {
        let mut total = 0;
        for round in 0..self.max_rounds {
            let work: usize = tasks.iter_mut().map(|task| task.tick()).sum();
            if work == 0 {
                trace!(rounds = round, steps = total, "scheduler idle");
                return total;
            }
            total += work;
        }
        let names: Vec<_> = tasks.iter().map(|task| task.name()).collect();
        warn!(
            max_rounds = self.max_rounds,
            tasks = ?names,
            "scheduler did not go idle; stopping this settle"
        );
        total
    }
}
