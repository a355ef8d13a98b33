//! Error taxonomy.
//!
//! Neither error is fatal: a `PersistenceError` only costs durability for one
//! mutation, and a `RemoteError` becomes an apology message in the chat.

use thiserror::Error;

/// The durable store could not be written (or read back for a write).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize chats: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// The question-answering call failed.
///
/// Callers treat every variant the same way; the variant is only kept so the
/// log line says what went wrong.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),
}
