use chrono::{DateTime, Utc};

use weave_core::{Chat, ChatId, UserId};

use super::{ChatRepository, RepositoryError};
use crate::DbPool;

pub struct SqlChatRepository {
    pool: DbPool,
}

impl SqlChatRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChatRow {
    id: String,
    user_id: String,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            id: ChatId(row.id),
            user_id: UserId(row.user_id),
            title: row.title,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
impl ChatRepository for SqlChatRepository {
    async fn list_for_user(
        &self,
        user_id: Option<&UserId>,
    ) -> Result<Vec<Chat>, RepositoryError> {
        let rows: Vec<ChatRow> = match user_id {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT id, user_id, title, created_at FROM chats \
                     WHERE user_id = ?1 ORDER BY created_at",
                )
                .bind(&user_id.0)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, user_id, title, created_at FROM chats ORDER BY created_at",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Chat::from).collect())
    }
}
