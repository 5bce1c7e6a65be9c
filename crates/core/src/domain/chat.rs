use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::message::{ChatMessage, Role};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub user_id: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted conversation message, as read from the chat store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredMessage> for ChatMessage {
    fn from(stored: &StoredMessage) -> Self {
        Self { role: stored.role, content: stored.content.clone() }
    }
}

/// Rebuild a transcript from stored history, preserving storage order.
pub fn transcript_from_history(history: &[StoredMessage]) -> Vec<ChatMessage> {
    history.iter().map(ChatMessage::from).collect()
}
