//! Ties the session store to the remote client and to views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch, RwLock};

use crate::models::Chat;
use crate::remote::AskBackend;
use crate::session::SessionStore;
use crate::storage::{ChatPersistence, KeyValueStore};

use super::events::{AppEvent, AppSnapshot, SendOutcome, ViewEvent};
use super::loading::{LoadingTracker, PendingGuard};

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 256;

/// Application controller shared by every view.
///
/// All store mutations happen under a short write lock. The only await that
/// happens outside of it is the remote call in [`ChatApp::send_message`],
/// which runs on its own task so the reply lands even if the caller goes away.
pub struct ChatApp<S, C> {
    store: RwLock<SessionStore<S>>,
    client: C,
    model: String,
    loading: LoadingTracker,
    sidebar_expanded: AtomicBool,
    tx: broadcast::Sender<AppEvent>,
}

impl<S: KeyValueStore, C: AskBackend> ChatApp<S, C> {
    /// Initialize the session store from `persistence` and wire it to `client`.
    pub fn new(persistence: ChatPersistence<S>, client: C, model: impl Into<String>) -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store: RwLock::new(SessionStore::init(persistence)),
            client,
            model: model.into(),
            loading: LoadingTracker::new(),
            sidebar_expanded: AtomicBool::new(false),
            tx,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Subscribe to the set of chats with a request in flight.
    pub fn subscribe_loading(&self) -> watch::Receiver<std::collections::BTreeSet<String>> {
        self.loading.subscribe()
    }

    /// Whether any request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Whether a request for `chat_id` is in flight.
    pub fn is_chat_loading(&self, chat_id: &str) -> bool {
        self.loading.is_pending(chat_id)
    }

    pub fn sidebar_expanded(&self) -> bool {
        self.sidebar_expanded.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let store = self.store.read().await;
        AppSnapshot {
            chats: store.chats().to_vec(),
            current_chat_id: store.current_chat_id().map(String::from),
            loading: self.loading.is_loading(),
            pending_chat_ids: self.loading.pending(),
            sidebar_expanded: self.sidebar_expanded(),
        }
    }

    pub async fn chats(&self) -> Vec<Chat> {
        self.store.read().await.chats().to_vec()
    }

    pub async fn current_chat(&self) -> Option<Chat> {
        self.store.read().await.current_chat().cloned()
    }

    pub async fn current_chat_id(&self) -> Option<String> {
        self.store.read().await.current_chat_id().map(String::from)
    }

    pub async fn create_chat(&self) -> String {
        let chat_id = self.store.write().await.create_chat();
        self.notify(AppEvent::ChatCreated {
            chat_id: chat_id.clone(),
        });
        chat_id
    }

    pub async fn delete_chat(&self, chat_id: &str) -> bool {
        let removed = self.store.write().await.delete_chat(chat_id);
        if removed {
            self.notify(AppEvent::ChatDeleted {
                chat_id: chat_id.to_string(),
            });
        }
        removed
    }

    pub async fn switch_chat(&self, chat_id: &str) -> bool {
        let switched = self.store.write().await.switch_chat(chat_id);
        if switched {
            self.notify(AppEvent::ChatSwitched {
                chat_id: chat_id.to_string(),
            });
        }
        switched
    }

    /// Flip the sidebar flag. Never touches chat data.
    pub fn toggle_sidebar(&self) -> bool {
        let expanded = !self.sidebar_expanded.fetch_xor(true, Ordering::SeqCst);
        self.notify(AppEvent::SidebarToggled { expanded });
        expanded
    }

    fn notify(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    /// Append the reply for a request that already holds `guard`.
    async fn finish_send(&self, question: String, guard: PendingGuard) -> SendOutcome {
        let chat_id = guard.chat_id().to_string();
        tracing::info!(chat_id = %chat_id, model = %self.model, "asking question");
        let result = self.client.ask(&question, &chat_id, &self.model).await;

        let outcome = {
            let mut store = self.store.write().await;
            match result {
                Ok(answer) => {
                    tracing::info!(chat_id = %chat_id, sources = answer.sources.len(), "answer received");
                    store
                        .append_bot_message(&chat_id, &answer.text, answer.sources)
                        .map_or(SendOutcome::Discarded, |_| SendOutcome::Answered)
                }
                Err(e) => {
                    tracing::warn!(chat_id = %chat_id, error = %e, "question failed");
                    store
                        .append_error_message(&chat_id)
                        .map_or(SendOutcome::Discarded, |_| SendOutcome::Apologized)
                }
            }
        };
        drop(guard);

        if outcome == SendOutcome::Discarded {
            tracing::debug!(chat_id = %chat_id, "chat deleted while waiting, reply dropped");
        } else {
            self.notify(AppEvent::MessageAppended { chat_id });
        }
        outcome
    }
}

impl<S, C> ChatApp<S, C>
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    /// Send `text` as a question in the current chat.
    ///
    /// Appends the user message, asks the service with the chat id as
    /// session id, then appends either the answer or the apology. The chat
    /// is marked loading for exactly the duration of the call. Failures of
    /// the call never escape this method.
    ///
    /// The call and the reply run on a spawned task. Dropping the returned
    /// future stops the wait, not the request: the reply is still appended
    /// and the loading mark still cleared.
    pub async fn send_message(self: &Arc<Self>, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let (chat_id, guard) = {
            let mut store = self.store.write().await;
            let Some(chat_id) = store.current_chat_id().map(String::from) else {
                return SendOutcome::Ignored;
            };
            if self.loading.is_pending(&chat_id) {
                tracing::debug!(chat_id = %chat_id, "send refused, request already in flight");
                return SendOutcome::Busy;
            }
            if store.append_user_message(&chat_id, text).is_none() {
                return SendOutcome::Ignored;
            }
            let Some(guard) = self.loading.begin(&chat_id) else {
                return SendOutcome::Busy;
            };
            (chat_id, guard)
        };
        self.notify(AppEvent::MessageAppended {
            chat_id: chat_id.clone(),
        });

        let app = Arc::clone(self);
        let question = text.to_string();
        let task = tokio::spawn(async move { app.finish_send(question, guard).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The guard was dropped with the task, so only the reply is missing.
                tracing::error!(chat_id = %chat_id, error = %e, "send task failed");
                let appended = self.store.write().await.append_error_message(&chat_id);
                if appended.is_none() {
                    return SendOutcome::Discarded;
                }
                self.notify(AppEvent::MessageAppended { chat_id });
                SendOutcome::Apologized
            }
        }
    }

    /// Apply a view intent. Returns the send outcome for `Send`.
    pub async fn dispatch(self: &Arc<Self>, event: ViewEvent) -> Option<SendOutcome> {
        match event {
            ViewEvent::Create => {
                self.create_chat().await;
                None
            }
            ViewEvent::Delete { id } => {
                self.delete_chat(&id).await;
                None
            }
            ViewEvent::Switch { id } => {
                self.switch_chat(&id).await;
                None
            }
            ViewEvent::Send { text } => Some(self.send_message(&text).await),
            ViewEvent::ToggleSidebar => {
                self.toggle_sidebar();
                None
            }
        }
    }
}
