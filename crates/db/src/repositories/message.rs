use chrono::{DateTime, Utc};

use weave_core::{ChatId, MessageId, StoredMessage};

use super::{decode_role, MessageRepository, RepositoryError};
use crate::DbPool;

pub struct SqlMessageRepository {
    pool: DbPool,
}

impl SqlMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    chat_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for StoredMessage {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId(row.id),
            chat_id: ChatId(row.chat_id),
            role: decode_role(&row.role)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[async_trait::async_trait]
impl MessageRepository for SqlMessageRepository {
    async fn list_for_chat(
        &self,
        chat_id: Option<&ChatId>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let rows: Vec<MessageRow> = match chat_id {
            Some(chat_id) => {
                sqlx::query_as(
                    "SELECT id, chat_id, role, content, created_at FROM messages \
                     WHERE chat_id = ?1 ORDER BY created_at",
                )
                .bind(&chat_id.0)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, chat_id, role, content, created_at FROM messages \
                     ORDER BY created_at",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(StoredMessage::try_from).collect()
    }
}
