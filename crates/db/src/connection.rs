use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

use weave_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_from_config(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

/// One timeout knob drives both sides of the pool: how long a caller waits
/// for a slot, and how long a connection waits on a locked database before
/// `SQLITE_BUSY` surfaces.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let timeout_secs = timeout_secs.clamp(1, 300);
    let busy_timeout_ms = timeout_secs * 1000;

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                let busy_timeout = format!("PRAGMA busy_timeout = {busy_timeout_ms}");
                sqlx::query(&busy_timeout).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use weave_core::config::DatabaseConfig;

    use super::{connect_from_config, connect_with_settings};

    #[tokio::test]
    async fn busy_timeout_follows_the_configured_timeout() {
        let pool = connect_with_settings("sqlite::memory:", 1, 7).await.expect("connect");

        let busy_timeout: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_timeout, 7_000);

        let foreign_keys: i64 =
            sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(&pool).await.expect("pragma");
        assert_eq!(foreign_keys, 1);

        pool.close().await;
    }

    #[tokio::test]
    async fn connect_from_config_uses_the_database_section() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 2,
            timeout_secs: 3,
        };
        let pool = connect_from_config(&config).await.expect("connect");

        let busy_timeout: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_timeout, 3_000);

        pool.close().await;
    }
}
