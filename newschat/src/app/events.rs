//! Intents emitted by a view and notifications sent back to it.

use serde::{Deserialize, Serialize};

use crate::models::Chat;

/// A user intent coming from a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Create,
    Delete { id: String },
    Switch { id: String },
    Send { text: String },
    ToggleSidebar,
}

/// Something changed that a view may want to re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    ChatCreated { chat_id: String },
    ChatDeleted { chat_id: String },
    ChatSwitched { chat_id: String },
    MessageAppended { chat_id: String },
    SidebarToggled { expanded: bool },
}

/// Result of a `send` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    /// Blank text, or no current chat. Nothing changed.
    Ignored,
    /// The current chat already has a request in flight. Nothing changed.
    Busy,
    /// The service answered and the reply was appended.
    Answered,
    /// The service call failed and the apology was appended.
    Apologized,
    /// The chat was deleted while its request was in flight. The reply was
    /// dropped.
    Discarded,
}

/// Full view state at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot {
    pub chats: Vec<Chat>,
    pub current_chat_id: Option<String>,
    pub loading: bool,
    pub pending_chat_ids: Vec<String>,
    pub sidebar_expanded: bool,
}

impl AppSnapshot {
    pub fn current_chat(&self) -> Option<&Chat> {
        let id = self.current_chat_id.as_deref()?;
        self.chats.iter().find(|c| c.id == id)
    }
}
