use tokio::sync::RwLock;

use weave_core::{Chat, ChatId, StoredMessage, User, UserId};

use super::{ChatRepository, MessageRepository, RepositoryError, UserRepository};

/// In-memory doubles for tests and offline wiring. Insertion order stands in
/// for `created_at` ordering.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: RwLock<Vec<Chat>>,
}

impl InMemoryChatRepository {
    pub async fn insert(&self, chat: Chat) {
        self.chats.write().await.push(chat);
    }
}

#[async_trait::async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn list_for_user(
        &self,
        user_id: Option<&UserId>,
    ) -> Result<Vec<Chat>, RepositoryError> {
        let chats = self.chats.read().await;
        Ok(match user_id {
            Some(user_id) => chats.iter().filter(|chat| &chat.user_id == user_id).cloned().collect(),
            None => chats.clone(),
        })
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<StoredMessage>>,
}

impl InMemoryMessageRepository {
    pub async fn insert(&self, message: StoredMessage) {
        self.messages.write().await.push(message);
    }
}

#[async_trait::async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list_for_chat(
        &self,
        chat_id: Option<&ChatId>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(match chat_id {
            Some(chat_id) => {
                messages.iter().filter(|message| &message.chat_id == chat_id).cloned().collect()
            }
            None => messages.clone(),
        })
    }
}
