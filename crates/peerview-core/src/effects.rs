//! Effects returned by scopes for the runtime to execute.
//!
//! Scopes never perform I/O. They return effects alongside their reducers;
//! the runtime dispatches bus events, queues navigation commands and links
//! for the host, and opens backend feeds on request.

use serde::{Deserialize, Serialize};

use crate::backend::Topic;
use crate::events::GlobalEvent;
use crate::ids::{FeedId, MsgId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Broadcast on the global bus.
    Dispatch(GlobalEvent),
    /// Forward to the host navigation stack.
    Navigate(Command),
    /// Open an additional backend feed for this scope.
    Open(Topic),
    /// Ask the host to open an external link.
    Link(String),
    /// Leave the application.
    Exit,
}

/// Navigation-stack command, executed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "screen", rename_all = "snake_case")]
pub enum Command {
    Push(Screen),
    CloseDrawer,
}

/// Screens outside the tab tree that a command can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Compose,
    Conversation(MsgId),
    NewConversation,
    Thread(MsgId),
    Profile(FeedId),
    Hashtag(String),
    PasteInvite,
    CreateInvite,
    Settings,
    RawDatabase,
}

impl Effect {
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigate(_))
    }
}
