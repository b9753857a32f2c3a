//! The scoped component contract.
//!
//! A scope is pure: for each input it looks at its current state and returns
//! [`Sinks`], the reducers to fold and the effects to execute. Parents embed
//! children by calling the child's `react` with the lens-projected state and
//! lifting the result with [`Sinks::lift`].

use crate::backend::Topic;
use crate::bus::EventFilter;
use crate::effects::Effect;
use crate::lens::Lens;
use crate::reducer::Reducer;
use crate::view::View;

/// Everything a scope produced for one input.
#[derive(Debug)]
pub struct Sinks<S> {
    pub reducers: Vec<Reducer<S>>,
    pub effects: Vec<Effect>,
}

impl<S> Default for Sinks<S> {
    fn default() -> Self {
        Self {
            reducers: Vec::new(),
            effects: Vec::new(),
        }
    }
}

impl<S: 'static> Sinks<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&mut self, reducer: Reducer<S>) {
        self.reducers.push(reducer);
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn extend(&mut self, other: Sinks<S>) {
        self.reducers.extend(other.reducers);
        self.effects.extend(other.effects);
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty() && self.effects.is_empty()
    }

    /// Lifts every reducer to the parent scope; effects pass through.
    pub fn lift<L>(self, lens: L) -> Sinks<L::Parent>
    where
        L: Lens<Child = S>,
    {
        Sinks {
            reducers: self.reducers.into_iter().map(|r| r.lift(lens)).collect(),
            effects: self.effects,
        }
    }

    /// Drops navigation commands, keeping reducers and other effects.
    ///
    /// Used for children that are not the live tab: their state still
    /// evolves but they do not drive the navigation stack.
    #[must_use]
    pub fn without_navigation(mut self) -> Self {
        self.effects.retain(|e| !e.is_navigation());
        self
    }
}

/// A node of the screen tree.
pub trait Scope {
    type State: Clone + 'static;
    type Input;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Kinds of bus events this scope (and its embedded children) reads.
    fn bus_filter(&self) -> EventFilter {
        EventFilter::all()
    }

    /// Backend feeds opened when the scope is mounted, in declaration order.
    fn topics(&self) -> Vec<Topic> {
        Vec::new()
    }

    /// Reducer producing the initial state.
    fn init(&self) -> Reducer<Self::State>;

    /// Reacts to one input against the current state.
    fn react(&mut self, input: Self::Input, state: &Self::State) -> Sinks<Self::State>;

    /// Runs after every reduction. Projects derived values (update counters)
    /// into outbound effects.
    fn observe(&mut self, _state: &Self::State) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&self, state: &Self::State) -> View;
}
