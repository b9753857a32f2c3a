//! Read-only collaborator feeds.
//!
//! The peer-to-peer backend is outside the screen tree. A scope names the
//! topics it needs; the runtime opens one feed per topic and folds the
//! updates in as inputs. A feed item may be an error: the runtime then logs
//! it and reopens the same topic instead of surfacing it to the tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ids::{About, FeedId, MsgId, Peer, Settings};
use crate::merge::{Pull, Stamped, pull_channel};

/// Items of a backend feed, stamped when the backend produced them.
pub type Feed = mpsc::UnboundedReceiver<Stamped<Result<BackendUpdate, BackendError>>>;

/// Errors reported by a backend feed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// A named feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    SelfFeedId,
    ProfileAbout(FeedId),
    MigrationProgress,
    IndexingProgress,
    Settings,
    Initialized,
    PublicUpdates,
    PrivateUpdates,
    ActivityUpdates,
    Peers,
    StagedPeers,
    LatestVersion,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfFeedId => f.write_str("self_feed_id"),
            Self::ProfileAbout(id) => write!(f, "profile_about({id})"),
            Self::MigrationProgress => f.write_str("migration_progress"),
            Self::IndexingProgress => f.write_str("indexing_progress"),
            Self::Settings => f.write_str("settings"),
            Self::Initialized => f.write_str("initialized"),
            Self::PublicUpdates => f.write_str("public_updates"),
            Self::PrivateUpdates => f.write_str("private_updates"),
            Self::ActivityUpdates => f.write_str("activity_updates"),
            Self::Peers => f.write_str("peers"),
            Self::StagedPeers => f.write_str("staged_peers"),
            Self::LatestVersion => f.write_str("latest_version"),
        }
    }
}

/// One item from a backend feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendUpdate {
    SelfFeedId(FeedId),
    About(About),
    /// Fraction in `0.0..=1.0`.
    MigrationProgress(f64),
    /// Fraction in `0.0..=1.0`.
    IndexingProgress(f64),
    Settings(Settings),
    Initialized,
    PublicUpdates(u32),
    /// Root message of a private thread with activity.
    PrivateUpdate(MsgId),
    ActivityUpdates(u32),
    Peers(Vec<Peer>),
    StagedPeers(Vec<Peer>),
    LatestVersion(String),
}

impl BackendUpdate {
    /// The topic that carries this update.
    pub fn topic(&self) -> Topic {
        match self {
            Self::SelfFeedId(_) => Topic::SelfFeedId,
            Self::About(about) => Topic::ProfileAbout(about.id.clone()),
            Self::MigrationProgress(_) => Topic::MigrationProgress,
            Self::IndexingProgress(_) => Topic::IndexingProgress,
            Self::Settings(_) => Topic::Settings,
            Self::Initialized => Topic::Initialized,
            Self::PublicUpdates(_) => Topic::PublicUpdates,
            Self::PrivateUpdate(_) => Topic::PrivateUpdates,
            Self::ActivityUpdates(_) => Topic::ActivityUpdates,
            Self::Peers(_) => Topic::Peers,
            Self::StagedPeers(_) => Topic::StagedPeers,
            Self::LatestVersion(_) => Topic::LatestVersion,
        }
    }
}

/// Source of backend feeds.
pub trait Backend {
    /// Opens a fresh feed for `topic`. Each call returns an independent feed.
    fn open(&self, topic: &Topic) -> Feed;
}

/// Pull function over `topic` that reopens the feed after an error item.
pub fn resubscribing(
    backend: Rc<dyn Backend>,
    topic: Topic,
) -> impl FnMut() -> Pull<Stamped<BackendUpdate>> + 'static {
    let mut feed = backend.open(&topic);
    move || match pull_channel(&mut feed) {
        Pull::Ready(Stamped {
            seq,
            item: Ok(update),
        }) => Pull::Ready(Stamped { seq, item: update }),
        Pull::Ready(Stamped { item: Err(error), .. }) => {
            warn!(topic = %topic, error = %error, "backend feed failed; resubscribing");
            feed = backend.open(&topic);
            Pull::Pending
        }
        Pull::Pending => Pull::Pending,
        Pull::Closed => Pull::Closed,
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

type Sender = mpsc::UnboundedSender<Stamped<Result<BackendUpdate, BackendError>>>;

/// Backend driven by explicit pushes. Used by tests and the scripted host.
#[derive(Debug, Default)]
pub struct ChannelBackend {
    feeds: RefCell<Vec<(Topic, Sender)>>,
}

impl ChannelBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends `update` to every open feed of its topic.
    ///
    /// Returns the number of feeds it reached. Nothing is buffered for feeds
    /// opened later.
    pub fn push(&self, update: BackendUpdate) -> usize {
        let topic = update.topic();
        self.send(&topic, Ok(update))
    }

    /// Sends an error item to every open feed of `topic`.
    pub fn fail(&self, topic: &Topic, error: BackendError) -> usize {
        self.send(topic, Err(error))
    }

    /// Number of live feeds for `topic`.
    pub fn open_feeds(&self, topic: &Topic) -> usize {
        let mut feeds = self.feeds.borrow_mut();
        feeds.retain(|(_, tx)| !tx.is_closed());
        feeds.iter().filter(|(t, _)| t == topic).count()
    }

    fn send(&self, topic: &Topic, item: Result<BackendUpdate, BackendError>) -> usize {
        let item = Stamped::now(item);
        let mut feeds = self.feeds.borrow_mut();
        feeds.retain(|(_, tx)| !tx.is_closed());
        let mut reached = 0;
        for (_, tx) in feeds.iter().filter(|(t, _)| t == topic) {
            if tx.send(item.clone()).is_ok() {
                reached += 1;
            }
        }
        if reached == 0 {
            debug!(topic = %topic, "no open feed for backend item");
        }
        reached
    }
}

impl Backend for ChannelBackend {
    fn open(&self, topic: &Topic) -> Feed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.feeds.borrow_mut().push((topic.clone(), tx));
        debug!(topic = %topic, "backend feed opened");
        rx
    }
}
