use async_trait::async_trait;
use thiserror::Error;

use weave_core::{Chat, ChatId, Role, StoredMessage, User, UserId};

pub mod chat;
pub mod memory;
pub mod message;
pub mod user;

pub use chat::SqlChatRepository;
pub use memory::{InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository};
pub use message::SqlMessageRepository;
pub use user::SqlUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// All chats, or only one user's when a filter is given.
    async fn list_for_user(&self, user_id: Option<&UserId>)
        -> Result<Vec<Chat>, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages, or only one chat's when a filter is given, ordered by
    /// creation time so they can seed a transcript directly.
    async fn list_for_chat(
        &self,
        chat_id: Option<&ChatId>,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;
}

pub(crate) fn decode_role(raw: &str) -> Result<Role, RepositoryError> {
    match raw {
        "system" => Ok(Role::System),
        "user" => Ok(Role::User),
        "assistant" => Ok(Role::Assistant),
        other => Err(RepositoryError::Decode(format!("unknown message role `{other}`"))),
    }
}
