//! Chat model representing one conversation thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, Message, Sender};

/// Maximum number of characters kept when deriving a title from a message.
pub const TITLE_MAX_CHARS: usize = 20;

/// Appended to a derived title that had to be cut.
pub const TITLE_ELLIPSIS: &str = "…";

/// A conversation with its own message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique, time-ordered identifier. Also sent to the service as session id.
    pub id: String,
    /// Sidebar title.
    pub title: String,
    /// Messages in insertion order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// When the chat was created.
    pub created: DateTime<Utc>,
}

impl Chat {
    /// Create an empty chat titled `Chat {ordinal}`.
    pub fn new(ordinal: usize) -> Self {
        Self {
            id: generate_id(),
            title: format!("Chat {ordinal}"),
            messages: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Append a message. The first user message names the chat.
    pub fn push(&mut self, message: Message) {
        if message.sender == Sender::User && !self.has_user_message() {
            self.title = derive_title(&message.text);
        }
        self.messages.push(message);
    }

    fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.sender == Sender::User)
    }
}

/// Title for a chat whose first message is `text`.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{TITLE_ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
