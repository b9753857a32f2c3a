//! Global event bus.
//!
//! One explicit bus instance is created at the composition root and handed to
//! every runtime. Scopes never hold references to each other; they dispatch
//! [`GlobalEvent`]s here and read the ones they care about from a
//! [`Subscription`].
//!
//! ## Lifecycle
//!
//! The bus starts *not ready*. Until a sink is attached with
//! [`EventBus::attach`], dispatches are dropped with a warning, never queued.
//! Once ready, every dispatch is enqueued synchronously into each live
//! subscriber before `dispatch` returns, so per-subscriber order equals
//! dispatch order. Late subscribers see nothing dispatched before they
//! subscribed.
//!
//! The handle is `Rc` based and therefore `!Send`: the whole tree runs on
//! one thread.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use crate::events::{EventKind, GlobalEvent};
use crate::merge::{Pull, Stamped};

// ============================================================================
// Filter
// ============================================================================

/// Read-side narrowing of the event stream by discriminant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Empty means every kind.
    kinds: HashSet<EventKind>,
}

impl EventFilter {
    /// Accepts every event.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Returns a filter accepting the union of both.
    #[must_use]
    pub fn union(mut self, other: &EventFilter) -> Self {
        if self.kinds.is_empty() || other.kinds.is_empty() {
            return Self::all();
        }
        self.kinds.extend(other.kinds.iter().copied());
        self
    }

    pub fn matches(&self, event: &GlobalEvent) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&event.kind())
    }
}

// ============================================================================
// Bus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    NotReady,
    Ready,
}

/// Dispatch counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    pub dispatched: u64,
    /// Dispatches that arrived before the bus was attached.
    pub dropped: u64,
}

#[derive(Debug)]
struct Inner {
    lifecycle: Lifecycle,
    subscribers: Vec<mpsc::UnboundedSender<Stamped<GlobalEvent>>>,
    stats: BusStats,
}

/// Shared handle to the process-wide bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    inner: Rc<RefCell<Inner>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus in the not-ready state.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                lifecycle: Lifecycle::NotReady,
                subscribers: Vec::new(),
                stats: BusStats::default(),
            })),
        }
    }

    /// Marks the bus ready. Called once by the composition root.
    pub fn attach(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.lifecycle == Lifecycle::Ready {
            debug!("event bus already attached");
            return;
        }
        inner.lifecycle = Lifecycle::Ready;
        debug!(subscribers = inner.subscribers.len(), "event bus attached");
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().lifecycle == Lifecycle::Ready
    }

    /// Broadcasts `event` to all current subscribers.
    ///
    /// Returns the number of subscribers the event was enqueued for. Returns
    /// 0 and drops the event when the bus is not attached yet.
    pub fn dispatch(&self, event: GlobalEvent) -> usize {
        let mut inner = self.inner.borrow_mut();
        if inner.lifecycle == Lifecycle::NotReady {
            inner.stats.dropped += 1;
            warn!(
                kind = %event.kind(),
                "Global event bus was not attached but dispatch was called; event dropped"
            );
            return 0;
        }

        // one stamp per dispatch: every subscriber sees the same arrival time
        let stamped = Stamped::now(event);
        inner
            .subscribers
            .retain(|tx| tx.send(stamped.clone()).is_ok());
        let event = stamped.item;
        inner.stats.dispatched += 1;
        let receivers = inner.subscribers.len();
        debug!(
            kind = %event.kind(),
            subtype = event.subtype().unwrap_or("-"),
            receivers,
            "event dispatched"
        );
        receivers
    }

    /// Opens a new reader. It sees only events dispatched from now on.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.borrow_mut().subscribers.push(tx);
        Subscription { rx, filter }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }

    pub fn stats(&self) -> BusStats {
        self.inner.borrow().stats
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// A reader of the bus. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Stamped<GlobalEvent>>,
    filter: EventFilter,
}

impl Subscription {
    /// Next matching event that is already queued.
    pub fn try_recv(&mut self) -> Option<GlobalEvent> {
        match self.pull() {
            Pull::Ready(stamped) => Some(stamped.item),
            Pull::Pending | Pull::Closed => None,
        }
    }

    /// Drains every matching event that is already queued.
    pub fn drain(&mut self) -> Vec<GlobalEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Non-blocking pull used by the merge pipeline.
    pub fn pull(&mut self) -> Pull<Stamped<GlobalEvent>> {
        loop {
            match self.rx.try_recv() {
                Ok(stamped) if self.filter.matches(&stamped.item) => return Pull::Ready(stamped),
                Ok(_) => {}
                Err(TryRecvError::Empty) => return Pull::Pending,
                Err(TryRecvError::Disconnected) => return Pull::Closed,
            }
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ContactScreenUpdate, ContactsTab, ContentScreenUpdate, ContentTab};

    fn change_tab(tab: ContentTab) -> GlobalEvent {
        ContentScreenUpdate::ChangeTab { tab }.into()
    }

    #[test]
    fn test_dispatch_before_attach_is_dropped() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        assert_eq!(bus.dispatch(GlobalEvent::HasNewVersion), 0);
        bus.attach();

        assert!(sub.try_recv().is_none());
        assert_eq!(bus.stats().dropped, 1);
        assert_eq!(bus.stats().dispatched, 0);
    }

    #[test]
    fn test_subscribers_observe_dispatch_order() {
        let bus = EventBus::new();
        bus.attach();
        let mut first = bus.subscribe(EventFilter::all());
        let mut second = bus.subscribe(EventFilter::all());

        bus.dispatch(change_tab(ContentTab::Messages));
        bus.dispatch(GlobalEvent::HardwareBackOnContentScreen);
        bus.dispatch(change_tab(ContentTab::Contacts));

        let expected = vec![
            change_tab(ContentTab::Messages),
            GlobalEvent::HardwareBackOnContentScreen,
            change_tab(ContentTab::Contacts),
        ];
        assert_eq!(first.drain(), expected);
        assert_eq!(second.drain(), expected);
    }

    #[test]
    fn test_late_subscriber_gets_no_replay() {
        let bus = EventBus::new();
        bus.attach();
        bus.dispatch(GlobalEvent::LocalizationLoaded);

        let mut late = bus.subscribe(EventFilter::all());
        assert!(late.try_recv().is_none());

        bus.dispatch(GlobalEvent::HasNewVersion);
        assert_eq!(late.try_recv(), Some(GlobalEvent::HasNewVersion));
    }

    #[test]
    fn test_filter_narrows_on_read_side() {
        let bus = EventBus::new();
        bus.attach();
        let mut contacts = bus.subscribe(EventFilter::kinds([EventKind::ContactScreenUpdate]));

        let receivers = bus.dispatch(GlobalEvent::LocalizationLoaded);
        bus.dispatch(
            ContactScreenUpdate::ChangeTab {
                tab: ContactsTab::Connections,
            }
            .into(),
        );

        // Delivery is to every subscriber; the filter only skips on read.
        assert_eq!(receivers, 1);
        assert_eq!(
            contacts.drain(),
            vec![GlobalEvent::from(ContactScreenUpdate::ChangeTab {
                tab: ContactsTab::Connections
            })]
        );
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let bus = EventBus::new();
        bus.attach();
        let kept = bus.subscribe(EventFilter::all());
        let gone = bus.subscribe(EventFilter::all());
        assert_eq!(bus.subscriber_count(), 2);

        drop(gone);
        assert_eq!(bus.dispatch(GlobalEvent::HasNewVersion), 1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_attach_twice_is_noop() {
        let bus = EventBus::new();
        bus.attach();
        bus.attach();
        assert!(bus.is_ready());
    }

    #[test]
    fn test_filter_union_with_all_is_all() {
        let narrow = EventFilter::kinds([EventKind::HasNewVersion]);
        let union = narrow.clone().union(&EventFilter::all());
        assert!(union.matches(&GlobalEvent::LocalizationLoaded));

        let both = narrow.union(&EventFilter::kinds([EventKind::LocalizationLoaded]));
        assert!(both.matches(&GlobalEvent::LocalizationLoaded));
        assert!(both.matches(&GlobalEvent::HasNewVersion));
        assert!(!both.matches(&GlobalEvent::HardwareBackOnCentralScreen));
    }
}
