//! Global event catalog.
//!
//! Every notification that crosses component boundaries is one of these
//! variants. The set is closed: adding an event means adding a variant here,
//! and every consumer that matches exhaustively is forced to look at it.
//!
//! The serde form mirrors the wire shape used by external hosts:
//! `{"type":"contactScreenUpdate","subtype":"changeTab","tab":"connections"}`.

use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::ids::{FeedId, MsgId};

// ============================================================================
// Tab identifiers
// ============================================================================

/// Top-level tabs of the content screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum ContentTab {
    #[default]
    Home,
    Messages,
    Contacts,
    Discover,
    Profiles,
}

/// Sub-tabs of the messages screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagesTab {
    #[default]
    Public,
    Private,
}

/// Sub-tabs of the contacts screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactsTab {
    #[default]
    Activity,
    Connections,
}

// ============================================================================
// Events
// ============================================================================

/// A cross-tree notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GlobalEvent {
    LocalizationLoaded,
    TriggerFeedCypherlink { feed_id: FeedId },
    TriggerMsgCypherlink { msg_id: MsgId },
    TriggerHashtagLink { hashtag: String },
    HardwareBackOnCentralScreen,
    DrawerToggleOnCentralScreen { open: bool },
    HardwareBackOnContentScreen,
    DrawerToggleOnContentScreen { open: bool },
    AudioBlobComposed { blob_id: String, ext: String },
    ContentScreenUpdate(ContentScreenUpdate),
    MessageScreenUpdate(MessageScreenUpdate),
    ContactScreenUpdate(ContactScreenUpdate),
    ApproveCheckingNewVersion,
    HasNewVersion,
}

/// Payloads of `contentScreenUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum ContentScreenUpdate {
    ChangeTab { tab: ContentTab },
    ScrollToTop { tab: ContentTab },
    HomeUpdates { counter: u32 },
    MessagesUpdates { counter: u32 },
    ContactsUpdates { counter: u32 },
    DiscoverUpdate { substate: u32 },
    ProfilesUpdates { counter: u32 },
}

/// Payloads of `messageScreenUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum MessageScreenUpdate {
    ChangeTab { tab: MessagesTab },
    ScrollToTop { tab: MessagesTab },
    PublicUpdates { counter: u32 },
    PrivateUpdates { counter: u32 },
}

/// Payloads of `contactScreenUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum ContactScreenUpdate {
    ChangeTab { tab: ContactsTab },
    ScrollToTop { tab: ContactsTab },
    ActivityUpdates { counter: u32 },
    ConnectionsUpdates { counter: u32 },
}

impl GlobalEvent {
    /// Returns the discriminant used for read-side filtering.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LocalizationLoaded => EventKind::LocalizationLoaded,
            Self::TriggerFeedCypherlink { .. } => EventKind::TriggerFeedCypherlink,
            Self::TriggerMsgCypherlink { .. } => EventKind::TriggerMsgCypherlink,
            Self::TriggerHashtagLink { .. } => EventKind::TriggerHashtagLink,
            Self::HardwareBackOnCentralScreen => EventKind::HardwareBackOnCentralScreen,
            Self::DrawerToggleOnCentralScreen { .. } => EventKind::DrawerToggleOnCentralScreen,
            Self::HardwareBackOnContentScreen => EventKind::HardwareBackOnContentScreen,
            Self::DrawerToggleOnContentScreen { .. } => EventKind::DrawerToggleOnContentScreen,
            Self::AudioBlobComposed { .. } => EventKind::AudioBlobComposed,
            Self::ContentScreenUpdate(_) => EventKind::ContentScreenUpdate,
            Self::MessageScreenUpdate(_) => EventKind::MessageScreenUpdate,
            Self::ContactScreenUpdate(_) => EventKind::ContactScreenUpdate,
            Self::ApproveCheckingNewVersion => EventKind::ApproveCheckingNewVersion,
            Self::HasNewVersion => EventKind::HasNewVersion,
        }
    }

    /// Wire name of the composite subtype, if this event has one.
    pub fn subtype(&self) -> Option<&'static str> {
        match self {
            Self::ContentScreenUpdate(update) => Some(match update {
                ContentScreenUpdate::ChangeTab { .. } => "changeTab",
                ContentScreenUpdate::ScrollToTop { .. } => "scrollToTop",
                ContentScreenUpdate::HomeUpdates { .. } => "homeUpdates",
                ContentScreenUpdate::MessagesUpdates { .. } => "messagesUpdates",
                ContentScreenUpdate::ContactsUpdates { .. } => "contactsUpdates",
                ContentScreenUpdate::DiscoverUpdate { .. } => "discoverUpdate",
                ContentScreenUpdate::ProfilesUpdates { .. } => "profilesUpdates",
            }),
            Self::MessageScreenUpdate(update) => Some(match update {
                MessageScreenUpdate::ChangeTab { .. } => "changeTab",
                MessageScreenUpdate::ScrollToTop { .. } => "scrollToTop",
                MessageScreenUpdate::PublicUpdates { .. } => "publicUpdates",
                MessageScreenUpdate::PrivateUpdates { .. } => "privateUpdates",
            }),
            Self::ContactScreenUpdate(update) => Some(match update {
                ContactScreenUpdate::ChangeTab { .. } => "changeTab",
                ContactScreenUpdate::ScrollToTop { .. } => "scrollToTop",
                ContactScreenUpdate::ActivityUpdates { .. } => "activityUpdates",
                ContactScreenUpdate::ConnectionsUpdates { .. } => "connectionsUpdates",
            }),
            _ => None,
        }
    }
}

impl From<ContentScreenUpdate> for GlobalEvent {
    fn from(update: ContentScreenUpdate) -> Self {
        Self::ContentScreenUpdate(update)
    }
}

impl From<MessageScreenUpdate> for GlobalEvent {
    fn from(update: MessageScreenUpdate) -> Self {
        Self::MessageScreenUpdate(update)
    }
}

impl From<ContactScreenUpdate> for GlobalEvent {
    fn from(update: ContactScreenUpdate) -> Self {
        Self::ContactScreenUpdate(update)
    }
}

// ============================================================================
// Discriminants
// ============================================================================

/// Bare discriminant of a [`GlobalEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LocalizationLoaded,
    TriggerFeedCypherlink,
    TriggerMsgCypherlink,
    TriggerHashtagLink,
    HardwareBackOnCentralScreen,
    DrawerToggleOnCentralScreen,
    HardwareBackOnContentScreen,
    DrawerToggleOnContentScreen,
    AudioBlobComposed,
    ContentScreenUpdate,
    MessageScreenUpdate,
    ContactScreenUpdate,
    ApproveCheckingNewVersion,
    HasNewVersion,
}

impl EventKind {
    pub const ALL: &'static [EventKind] = &[
        Self::LocalizationLoaded,
        Self::TriggerFeedCypherlink,
        Self::TriggerMsgCypherlink,
        Self::TriggerHashtagLink,
        Self::HardwareBackOnCentralScreen,
        Self::DrawerToggleOnCentralScreen,
        Self::HardwareBackOnContentScreen,
        Self::DrawerToggleOnContentScreen,
        Self::AudioBlobComposed,
        Self::ContentScreenUpdate,
        Self::MessageScreenUpdate,
        Self::ContactScreenUpdate,
        Self::ApproveCheckingNewVersion,
        Self::HasNewVersion,
    ];

    /// Wire name (the `type` field).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalizationLoaded => "localizationLoaded",
            Self::TriggerFeedCypherlink => "triggerFeedCypherlink",
            Self::TriggerMsgCypherlink => "triggerMsgCypherlink",
            Self::TriggerHashtagLink => "triggerHashtagLink",
            Self::HardwareBackOnCentralScreen => "hardwareBackOnCentralScreen",
            Self::DrawerToggleOnCentralScreen => "drawerToggleOnCentralScreen",
            Self::HardwareBackOnContentScreen => "hardwareBackOnContentScreen",
            Self::DrawerToggleOnContentScreen => "drawerToggleOnContentScreen",
            Self::AudioBlobComposed => "audioBlobComposed",
            Self::ContentScreenUpdate => "contentScreenUpdate",
            Self::MessageScreenUpdate => "messageScreenUpdate",
            Self::ContactScreenUpdate => "contactScreenUpdate",
            Self::ApproveCheckingNewVersion => "approveCheckingNewVersion",
            Self::HasNewVersion => "hasNewVersion",
        }
    }

    /// Subtypes of composite families; empty for plain events.
    pub fn subtypes(self) -> &'static [&'static str] {
        match self {
            Self::ContentScreenUpdate => &[
                "changeTab",
                "scrollToTop",
                "homeUpdates",
                "messagesUpdates",
                "contactsUpdates",
                "discoverUpdate",
                "profilesUpdates",
            ],
            Self::MessageScreenUpdate => {
                &["changeTab", "scrollToTop", "publicUpdates", "privateUpdates"]
            }
            Self::ContactScreenUpdate => &[
                "changeTab",
                "scrollToTop",
                "activityUpdates",
                "connectionsUpdates",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
