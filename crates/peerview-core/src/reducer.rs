//! Reducers and the state fold.
//!
//! A reducer maps the previous state (absent before initialization) to the
//! next one. Reducers are applied one at a time in arrival order; each sees
//! the result of every reducer applied before it.

use std::fmt;

use tracing::trace;

use crate::lens::Lens;

type ReduceFn<S> = Box<dyn FnOnce(Option<S>) -> Option<S>>;

/// A named state transition.
pub struct Reducer<S> {
    name: &'static str,
    f: ReduceFn<S>,
}

impl<S: 'static> Reducer<S> {
    pub fn new(name: &'static str, f: impl FnOnce(Option<S>) -> Option<S> + 'static) -> Self {
        Self {
            name,
            f: Box::new(f),
        }
    }

    /// Produces a complete state. Leaves an existing state untouched, so a
    /// remounted scope keeps what it had.
    pub fn init(name: &'static str, initial: impl FnOnce() -> S + 'static) -> Self {
        Self::new(name, move |prev| Some(prev.unwrap_or_else(initial)))
    }

    /// Transforms an existing state; the identity while state is absent.
    pub fn update(name: &'static str, f: impl FnOnce(S) -> S + 'static) -> Self {
        Self::new(name, move |prev| prev.map(f))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(self, prev: Option<S>) -> Option<S> {
        (self.f)(prev)
    }

    /// Runs `next` on the result of `self`, keeping the first name.
    #[must_use]
    pub fn then(self, next: Reducer<S>) -> Self {
        let name = self.name;
        Self::new(name, move |prev| next.apply(self.apply(prev)))
    }

    /// Lifts a child reducer to the parent scope through `lens`.
    ///
    /// The lifted reducer is the identity while the parent is absent. A child
    /// reducer returning `None` leaves the parent unchanged.
    pub fn lift<L>(self, lens: L) -> Reducer<L::Parent>
    where
        L: Lens<Child = S>,
    {
        let name = self.name;
        Reducer::new(name, move |parent: Option<L::Parent>| {
            let parent = parent?;
            match self.apply(Some(lens.get(&parent))) {
                Some(child) => Some(lens.set(parent, child)),
                None => Some(parent),
            }
        })
    }
}

impl<S> fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").field("name", &self.name).finish()
    }
}

// ============================================================================
// Store
// ============================================================================

/// Holds the folded state of one scope.
#[derive(Debug)]
pub struct Store<S> {
    state: Option<S>,
}

impl<S> Default for Store<S> {
    fn default() -> Self {
        Self { state: None }
    }
}

impl<S: 'static> Store<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn apply(&mut self, reducer: Reducer<S>) {
        let name = reducer.name();
        self.state = reducer.apply(self.state.take());
        trace!(reducer = name, present = self.state.is_some(), "reducer applied");
    }
}
