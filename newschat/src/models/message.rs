//! Message model representing one entry in a chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, Source};

/// Text shown in place of an answer when the remote call fails.
pub const APOLOGY_TEXT: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the question-answering service (or the apology fallback).
    Bot,
}

/// A message in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, time-ordered identifier.
    pub id: String,
    /// Author of the message.
    pub sender: Sender,
    /// Message body.
    pub text: String,
    /// Citations attached to a bot answer. Always empty for user messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            sender: Sender::User,
            text: text.into(),
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a bot message carrying an answer and its sources.
    pub fn bot(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            id: generate_id(),
            sender: Sender::Bot,
            text: text.into(),
            sources,
            timestamp: Utc::now(),
        }
    }

    /// Create the bot message appended when a remote call fails.
    pub fn apology() -> Self {
        Self::bot(APOLOGY_TEXT, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_has_no_sources_in_json() {
        let msg = Message::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "user");
        assert!(json.get("sources").is_none());
    }

    #[test]
    fn apology_is_a_bot_message_without_sources() {
        let msg = Message::apology();
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.text, APOLOGY_TEXT);
        assert!(msg.sources.is_empty());
    }

    #[test]
    fn parses_browser_stored_message() {
        let json = r#"{"id":"1718000000000","sender":"bot","text":"Hi","sources":["http://a.com",{"title":"B"}],"timestamp":"2024-06-10T08:30:00.000Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.sources.len(), 2);
    }
}
