//! In-memory chat collection with write-through persistence.

use crate::models::{Chat, Message, Source};
use crate::storage::{ChatPersistence, KeyValueStore};

/// Owns the chat collection and the current selection.
///
/// Chats are kept newest-first. After construction the collection is never
/// empty and the current chat always exists. Every mutation writes the whole
/// collection back through the persistence adapter; a failed write is logged
/// and otherwise ignored.
#[derive(Debug)]
pub struct SessionStore<S> {
    chats: Vec<Chat>,
    current_chat_id: Option<String>,
    persistence: ChatPersistence<S>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Load the stored collection and select the newest chat, creating one
    /// if nothing was stored.
    pub fn init(persistence: ChatPersistence<S>) -> Self {
        let chats = persistence.load();
        let current_chat_id = chats.first().map(|c| c.id.clone());
        let mut store = Self {
            chats,
            current_chat_id,
            persistence,
        };
        if store.chats.is_empty() {
            store.create_chat();
        }
        tracing::debug!(chats = store.chats.len(), "session store initialized");
        store
    }

    /// All chats, newest first.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    /// The selected chat, if the selection resolves.
    pub fn current_chat(&self) -> Option<&Chat> {
        let id = self.current_chat_id.as_deref()?;
        self.chat(id)
    }

    /// Messages of the selected chat, or nothing.
    pub fn current_messages(&self) -> &[Message] {
        self.current_chat()
            .map(|c| c.messages.as_slice())
            .unwrap_or_default()
    }

    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    fn chat_mut(&mut self, id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == id)
    }

    /// Start a new empty chat, make it current, and return its id.
    pub fn create_chat(&mut self) -> String {
        let chat = Chat::new(self.chats.len() + 1);
        let id = chat.id.clone();
        tracing::debug!(chat_id = %id, title = %chat.title, "created chat");

        self.chats.insert(0, chat);
        self.current_chat_id = Some(id.clone());
        self.persist();
        id
    }

    /// Remove a chat. Unknown ids are ignored.
    ///
    /// Removing the current chat selects the newest remaining one, or a fresh
    /// chat if none remain. Returns whether anything was removed.
    pub fn delete_chat(&mut self, id: &str) -> bool {
        let Some(index) = self.chats.iter().position(|c| c.id == id) else {
            return false;
        };
        self.chats.remove(index);
        tracing::debug!(chat_id = %id, "deleted chat");

        if self.current_chat_id.as_deref() == Some(id) {
            self.current_chat_id = self.chats.first().map(|c| c.id.clone());
            if self.current_chat_id.is_none() {
                // create_chat persists on its own.
                self.create_chat();
                return true;
            }
        }

        self.persist();
        true
    }

    /// Select a chat. Unknown ids leave the selection unchanged.
    pub fn switch_chat(&mut self, id: &str) -> bool {
        if self.chat(id).is_none() {
            tracing::debug!(chat_id = %id, "ignoring switch to unknown chat");
            return false;
        }
        self.current_chat_id = Some(id.to_string());
        true
    }

    /// Append a user message. Blank text or an unknown chat is a no-op.
    ///
    /// The first message of a chat also becomes its title.
    pub fn append_user_message(&mut self, chat_id: &str, text: &str) -> Option<Message> {
        if text.trim().is_empty() {
            return None;
        }
        self.append(chat_id, Message::user(text))
    }

    /// Append an answer from the service.
    pub fn append_bot_message(
        &mut self,
        chat_id: &str,
        text: &str,
        sources: Vec<Source>,
    ) -> Option<Message> {
        self.append(chat_id, Message::bot(text, sources))
    }

    /// Append the fixed apology shown when the service call failed.
    pub fn append_error_message(&mut self, chat_id: &str) -> Option<Message> {
        self.append(chat_id, Message::apology())
    }

    fn append(&mut self, chat_id: &str, message: Message) -> Option<Message> {
        let Some(chat) = self.chat_mut(chat_id) else {
            tracing::debug!(chat_id = %chat_id, "dropping message for unknown chat");
            return None;
        };
        chat.push(message.clone());
        self.persist();
        Some(message)
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.chats) {
            tracing::warn!(error = %e, "failed to persist chats; changes kept in memory only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sender, APOLOGY_TEXT};
    use crate::storage::MemoryStore;

    fn fresh() -> (SessionStore<MemoryStore>, MemoryStore) {
        let kv = MemoryStore::new();
        let store = SessionStore::init(ChatPersistence::new(kv.clone()));
        (store, kv)
    }

    fn reload(kv: &MemoryStore) -> Vec<Chat> {
        ChatPersistence::new(kv.clone()).load()
    }

    #[test]
    fn init_on_empty_storage_creates_chat_1() {
        let (store, kv) = fresh();
        assert_eq!(store.chats().len(), 1);
        assert_eq!(store.chats()[0].title, "Chat 1");
        assert_eq!(store.current_chat_id(), Some(store.chats()[0].id.as_str()));
        assert_eq!(reload(&kv).len(), 1);
    }

    #[test]
    fn init_selects_newest_stored_chat() {
        let kv = MemoryStore::new();
        let persistence = ChatPersistence::new(kv.clone());
        let newest = Chat::new(2);
        let oldest = Chat::new(1);
        persistence.save(&[newest.clone(), oldest]).unwrap();

        let store = SessionStore::init(ChatPersistence::new(kv));
        assert_eq!(store.chats().len(), 2);
        assert_eq!(store.current_chat_id(), Some(newest.id.as_str()));
    }

    #[test]
    fn create_chat_prepends_and_selects() {
        let (mut store, kv) = fresh();
        let id = store.create_chat();
        assert_eq!(store.chats()[0].id, id);
        assert_eq!(store.chats()[0].title, "Chat 2");
        assert_eq!(store.current_chat_id(), Some(id.as_str()));
        assert_eq!(reload(&kv)[0].id, id);
    }

    #[test]
    fn delete_unknown_chat_is_noop() {
        let (mut store, _) = fresh();
        let before = store.chats().to_vec();
        assert!(!store.delete_chat("missing"));
        assert_eq!(store.chats(), before.as_slice());
    }

    #[test]
    fn delete_current_selects_newest_remaining() {
        let (mut store, _) = fresh();
        let older = store.current_chat_id().unwrap().to_string();
        let newer = store.create_chat();

        assert!(store.delete_chat(&newer));
        assert_eq!(store.current_chat_id(), Some(older.as_str()));
    }

    #[test]
    fn delete_other_chat_keeps_selection() {
        let (mut store, kv) = fresh();
        let older = store.current_chat_id().unwrap().to_string();
        let newer = store.create_chat();

        assert!(store.delete_chat(&older));
        assert_eq!(store.current_chat_id(), Some(newer.as_str()));
        assert_eq!(reload(&kv).len(), 1);
    }

    #[test]
    fn deleting_last_chat_creates_a_new_one() {
        let (mut store, kv) = fresh();
        let only = store.current_chat_id().unwrap().to_string();

        assert!(store.delete_chat(&only));
        assert_eq!(store.chats().len(), 1);
        assert_ne!(store.chats()[0].id, only);
        assert_eq!(store.chats()[0].title, "Chat 1");
        assert!(store.current_chat().is_some());
        assert_eq!(reload(&kv).len(), 1);
    }

    #[test]
    fn collection_never_empty_over_mixed_operations() {
        let (mut store, _) = fresh();
        for round in 0..5 {
            for _ in 0..round {
                store.create_chat();
            }
            let ids: Vec<String> = store.chats().iter().map(|c| c.id.clone()).collect();
            for id in ids {
                store.delete_chat(&id);
                assert!(!store.chats().is_empty());
                assert!(store.current_chat().is_some());
            }
        }
    }

    #[test]
    fn switch_to_known_chat() {
        let (mut store, _) = fresh();
        let first = store.current_chat_id().unwrap().to_string();
        store.create_chat();
        assert!(store.switch_chat(&first));
        assert_eq!(store.current_chat_id(), Some(first.as_str()));
    }

    #[test]
    fn switch_to_unknown_chat_keeps_selection() {
        let (mut store, _) = fresh();
        let current = store.current_chat_id().unwrap().to_string();
        assert!(!store.switch_chat("dangling"));
        assert_eq!(store.current_chat_id(), Some(current.as_str()));
        assert!(store.current_chat().is_some());
    }

    #[test]
    fn blank_user_message_is_ignored() {
        let (mut store, _) = fresh();
        let id = store.current_chat_id().unwrap().to_string();
        assert!(store.append_user_message(&id, "   \n").is_none());
        assert!(store.current_messages().is_empty());
        assert_eq!(store.current_chat().unwrap().title, "Chat 1");
    }

    #[test]
    fn user_message_for_unknown_chat_is_ignored() {
        let (mut store, _) = fresh();
        assert!(store.append_user_message("missing", "hello").is_none());
    }

    #[test]
    fn first_user_message_sets_title_once() {
        let (mut store, kv) = fresh();
        let id = store.current_chat_id().unwrap().to_string();

        let msg = store
            .append_user_message(&id, "Tell me about the elections in Europe")
            .unwrap();
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(store.current_chat().unwrap().title, "Tell me about the el…");

        store.append_user_message(&id, "and the results?");
        assert_eq!(store.current_chat().unwrap().title, "Tell me about the el…");
        assert_eq!(store.current_messages().len(), 2);
        assert_eq!(reload(&kv)[0].messages.len(), 2);
    }

    #[test]
    fn bot_and_error_messages_append_in_order() {
        let (mut store, _) = fresh();
        let id = store.current_chat_id().unwrap().to_string();
        store.append_user_message(&id, "q");
        store.append_bot_message(&id, "a", vec![Source::Bare("http://a.com".into())]);
        store.append_error_message(&id);

        let messages = store.current_messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "a");
        assert_eq!(messages[1].sources.len(), 1);
        assert_eq!(messages[2].text, APOLOGY_TEXT);
        assert!(messages[2].sources.is_empty());
    }

    #[test]
    fn apology_first_leaves_title_for_user_message() {
        let (mut store, kv) = fresh();
        let id = store.current_chat_id().unwrap().to_string();

        store.append_error_message(&id);
        assert_eq!(store.current_chat().unwrap().title, "Chat 1");

        store.append_user_message(&id, "retry please");
        assert_eq!(store.current_chat().unwrap().title, "retry please");
        assert_eq!(reload(&kv)[0].title, "retry please");
    }

    #[test]
    fn rejected_writes_keep_memory_state() {
        let (mut store, kv) = fresh();
        kv.set_reject_writes(true);

        let id = store.create_chat();
        store.append_user_message(&id, "still here");

        assert_eq!(store.chats().len(), 2);
        assert_eq!(store.current_messages().len(), 1);
        assert_eq!(reload(&kv).len(), 1);
    }
}
