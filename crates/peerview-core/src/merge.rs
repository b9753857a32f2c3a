//! Fan-in of many input sources into one ordered batch.
//!
//! Every item is [`Stamped`] with a per-thread sequence number at the moment
//! it is enqueued. [`Merge::drain`] pulls everything that is ready from all
//! sources and orders the batch by stamp, so items are processed in arrival
//! order no matter which source they came through. Items sharing a stamp
//! (emitted by the same synchronous step) go in source declaration order.
//! Items that become ready while a batch is being processed land in the next
//! batch.

use std::borrow::Cow;
use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

/// Arrival position on the current thread.
pub type Seq = u64;

thread_local! {
    static NEXT_SEQ: Cell<Seq> = const { Cell::new(0) };
}

/// Takes the next sequence number. Strictly increasing per thread.
pub fn next_seq() -> Seq {
    NEXT_SEQ.with(|next| {
        let seq = next.get();
        next.set(seq + 1);
        seq
    })
}

/// An item tagged with the time it was enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<T> {
    pub seq: Seq,
    pub item: T,
}

impl<T> Stamped<T> {
    /// Stamps `item` with the next sequence number.
    pub fn now(item: T) -> Self {
        Self {
            seq: next_seq(),
            item,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stamped<U> {
        Stamped {
            seq: self.seq,
            item: f(self.item),
        }
    }
}

/// Result of a non-blocking pull from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull<T> {
    Ready(T),
    /// Nothing right now; try again next drain.
    Pending,
    /// The source will never produce again and is removed.
    Closed,
}

impl<T> Pull<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Pull<U> {
        match self {
            Self::Ready(item) => Pull::Ready(f(item)),
            Self::Pending => Pull::Pending,
            Self::Closed => Pull::Closed,
        }
    }
}

/// Non-blocking pull from an unbounded channel.
pub fn pull_channel<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Pull<T> {
    match rx.try_recv() {
        Ok(item) => Pull::Ready(item),
        Err(TryRecvError::Empty) => Pull::Pending,
        Err(TryRecvError::Disconnected) => Pull::Closed,
    }
}

struct Source<T> {
    name: Cow<'static, str>,
    pull: Box<dyn FnMut() -> Pull<Stamped<T>>>,
}

/// Ordered set of sources.
pub struct Merge<T> {
    sources: Vec<Source<T>>,
}

impl<T> Default for Merge<T> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
        }
    }
}

impl<T: 'static> fmt::Debug for Merge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merge")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl<T: 'static> Merge<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source after every source registered so far.
    pub fn add(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        pull: impl FnMut() -> Pull<Stamped<T>> + 'static,
    ) {
        self.sources.push(Source {
            name: name.into(),
            pull: Box::new(pull),
        });
    }

    /// Appends a channel of stamped items, mapping each item into `T`.
    pub fn add_channel<U: 'static>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        mut rx: mpsc::UnboundedReceiver<Stamped<U>>,
        map: impl Fn(U) -> T + 'static,
    ) {
        self.add(name, move || {
            pull_channel(&mut rx).map(|stamped| stamped.map(&map))
        });
    }

    /// Appends a finite source that closes once its items are consumed.
    ///
    /// The items are stamped now, so they precede anything enqueued later.
    pub fn add_items(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        items: impl IntoIterator<Item = T>,
    ) {
        let mut items: VecDeque<Stamped<T>> = items.into_iter().map(Stamped::now).collect();
        self.add(name, move || match items.pop_front() {
            Some(item) => Pull::Ready(item),
            None => Pull::Closed,
        });
    }

    /// Pulls everything currently ready, in arrival order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut batch = Vec::new();
        let mut position = 0usize;
        self.sources.retain_mut(|source| {
            position += 1;
            loop {
                match (source.pull)() {
                    Pull::Ready(stamped) => batch.push((stamped.seq, position, stamped.item)),
                    Pull::Pending => return true,
                    Pull::Closed => {
                        debug!(source = %source.name, "merge source closed");
                        return false;
                    }
                }
            }
        });
        batch.sort_by_key(|&(seq, position, _)| (seq, position));
        batch.into_iter().map(|(_, _, item)| item).collect()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Suppresses consecutive equal values. The first value always passes.
#[derive(Debug, Clone, Default)]
pub struct DropRepeats<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> DropRepeats<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Returns `Some(value)` when it differs from the previous one.
    pub fn observe(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }
}
