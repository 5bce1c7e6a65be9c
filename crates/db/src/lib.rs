//! Read-only chat store for the agent orchestration.
//!
//! The core never writes here: users, chats, and messages arrive through
//! another surface, and this crate only answers the three filtered reads the
//! orchestration needs to seed a transcript (all users, chats by user,
//! messages by chat).

pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_from_config, connect_with_settings, DbPool};
pub use repositories::{
    ChatRepository, InMemoryChatRepository, InMemoryMessageRepository, InMemoryUserRepository,
    MessageRepository, RepositoryError, SqlChatRepository, SqlMessageRepository,
    SqlUserRepository, UserRepository,
};
