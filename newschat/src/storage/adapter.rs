//! Serializes the whole chat collection under one well-known key.

use crate::error::PersistenceError;
use crate::models::Chat;

use super::KeyValueStore;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "vue-news-chats";

/// Reads and writes the chat collection as a single JSON blob.
#[derive(Debug, Clone)]
pub struct ChatPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ChatPersistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the stored collection.
    ///
    /// A missing, unreadable or unparsable blob yields an empty collection.
    pub fn load(&self) -> Vec<Chat> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored chats");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read stored chats");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(chats) => chats,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "stored chats are unparsable, starting fresh");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection with `chats`.
    pub fn save(&self, chats: &[Chat]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(chats)?;
        self.store.set(&self.key, &json)
    }
}
