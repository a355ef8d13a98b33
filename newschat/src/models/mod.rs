//! Data models for chats, messages and sources.

mod chat;
mod message;
mod source;

use uuid::Uuid;

pub use chat::{derive_title, Chat, TITLE_ELLIPSIS, TITLE_MAX_CHARS};
pub use message::{Message, Sender, APOLOGY_TEXT};
pub use source::{ResolvedSource, Source, NO_URL};

/// Generate a UUIDv7 (time-ordered, globally unique).
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
