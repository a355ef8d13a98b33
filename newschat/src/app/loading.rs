//! Tracks which chats have a request in flight.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

/// Set of chat ids with an outstanding remote call, observable through a
/// `watch` channel.
#[derive(Debug)]
pub struct LoadingTracker {
    tx: Arc<watch::Sender<BTreeSet<String>>>,
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BTreeSet::new());
        Self { tx: Arc::new(tx) }
    }

    /// Whether any chat is waiting for an answer.
    pub fn is_loading(&self) -> bool {
        !self.tx.borrow().is_empty()
    }

    /// Whether `chat_id` is waiting for an answer.
    pub fn is_pending(&self, chat_id: &str) -> bool {
        self.tx.borrow().contains(chat_id)
    }

    /// Chat ids currently waiting, in id order.
    pub fn pending(&self) -> Vec<String> {
        self.tx.borrow().iter().cloned().collect()
    }

    /// Mark `chat_id` as loading until the returned guard is dropped.
    ///
    /// Returns `None` if the chat is already loading. The guard does not
    /// borrow the tracker, so it can move into a spawned task.
    pub fn begin(&self, chat_id: &str) -> Option<PendingGuard> {
        let inserted = self
            .tx
            .send_if_modified(|pending| pending.insert(chat_id.to_string()));
        inserted.then(|| PendingGuard {
            tx: Arc::clone(&self.tx),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.tx.subscribe()
    }
}

/// Clears the loading mark for one chat on drop, including on early return
/// or when the owning task panics.
#[derive(Debug)]
pub struct PendingGuard {
    tx: Arc<watch::Sender<BTreeSet<String>>>,
    chat_id: String,
}

impl PendingGuard {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.tx.send_if_modified(|pending| pending.remove(&self.chat_id));
    }
}
