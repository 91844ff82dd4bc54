use crate::core::reactions::{ReactionCount, ReactionError, ReactionStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub struct SqliteReactionStore {
    pool: Pool<Sqlite>,
}

impl SqliteReactionStore {
    /// Accepts a bare file path or any sqlx SQLite URL (`sqlite:`, `sqlite://`,
    /// query parameters, `:memory:`).
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };
        let options = SqliteConnectOptions::from_str(&conn_str)?.create_if_missing(true);

        // sqlx creates the file but not its directory
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        // Every connection to :memory: opens its own empty database, so pin to one
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options.max_connections(1);
        }
        let pool = pool_options.connect_with(options).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reaction_counts (
                user_id INTEGER PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReactionStore for SqliteReactionStore {
    async fn increment(&self, user_id: u64) -> Result<u64, ReactionError> {
        let row = sqlx::query(
            r#"
            INSERT INTO reaction_counts (user_id, count)
            VALUES (?, 1)
            ON CONFLICT(user_id) DO UPDATE SET
            count = count + 1
            RETURNING count
            "#,
        )
        .bind(user_id as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ReactionError::StorageError(e.to_string()))?;

        Ok(row.get::<i64, _>("count") as u64)
    }

    async fn find_one(&self, user_id: u64) -> Result<Option<ReactionCount>, ReactionError> {
        let row = sqlx::query("SELECT user_id, count FROM reaction_counts WHERE user_id = ?")
            .bind(user_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ReactionError::StorageError(e.to_string()))?;

        Ok(row.map(|row| row_to_count(&row)))
    }

    async fn top(&self, limit: usize) -> Result<Vec<ReactionCount>, ReactionError> {
        let rows =
            sqlx::query("SELECT user_id, count FROM reaction_counts ORDER BY count DESC LIMIT ?")
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| ReactionError::StorageError(e.to_string()))?;

        Ok(rows.iter().map(row_to_count).collect())
    }

    async fn delete_all(&self) -> Result<(), ReactionError> {
        sqlx::query("DELETE FROM reaction_counts")
            .execute(&self.pool)
            .await
            .map_err(|e| ReactionError::StorageError(e.to_string()))?;
        Ok(())
    }
}

fn row_to_count(row: &sqlx::sqlite::SqliteRow) -> ReactionCount {
    ReactionCount {
        user_id: row.get::<i64, _>("user_id") as u64,
        count: row.get::<i64, _>("count") as u64,
    }
}
