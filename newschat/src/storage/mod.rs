//! Durable storage for the chat collection.

mod adapter;
mod kv;

pub use adapter::{ChatPersistence, DEFAULT_STORAGE_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
