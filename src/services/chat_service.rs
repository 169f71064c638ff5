use crate::models::message::ChatMessage;
use crate::store::{document_store, next_id, Document, DocumentStore};
use chrono::Utc;

impl Document for ChatMessage {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct ChatService {
    store: DocumentStore,
}

impl ChatService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn all_messages(&self) -> Vec<ChatMessage> {
        self.store
            .load(document_store::CHAT_MESSAGES, Vec::new())
            .await
    }

    pub async fn messages_for(&self, user_id: i64) -> Vec<ChatMessage> {
        self.all_messages()
            .await
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect()
    }

    pub async fn add_message(
        &self,
        user_id: i64,
        username: &str,
        message: &str,
        is_admin_reply: bool,
    ) -> Option<ChatMessage> {
        let mut messages = self.all_messages().await;
        let entry = ChatMessage {
            id: next_id(&messages),
            user_id,
            username: username.to_string(),
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            is_admin_reply,
            is_read: false,
        };
        messages.push(entry.clone());
        if self
            .store
            .save(document_store::CHAT_MESSAGES, &messages)
            .await
        {
            Some(entry)
        } else {
            None
        }
    }

    pub async fn mark_read(&self, message_id: i64) -> bool {
        let mut messages = self.all_messages().await;
        let Some(message) = messages.iter_mut().find(|m| m.id == message_id) else {
            return false;
        };
        message.is_read = true;
        self.store
            .save(document_store::CHAT_MESSAGES, &messages)
            .await
    }
}
