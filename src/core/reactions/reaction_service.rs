// Reaction counting - the business logic behind the leaderboard.
// Like the rest of core, this knows nothing about Discord: callers hand it
// primitive ids and the emoji name, and it decides what gets counted.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::BotConfig;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// How many qualifying reactions a user's messages have collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub user_id: u64,
    pub count: u64,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid user ID")]
    InvalidId,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Persistence for reaction counts. At most one record exists per user.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Add one to the user's count, creating the record at 1 if absent.
    /// Must be a single atomic upsert. Returns the new count.
    async fn increment(&self, user_id: u64) -> Result<u64, ReactionError>;

    async fn find_one(&self, user_id: u64) -> Result<Option<ReactionCount>, ReactionError>;

    /// Records sorted by count, highest first, truncated to `limit`.
    async fn top(&self, limit: usize) -> Result<Vec<ReactionCount>, ReactionError>;

    async fn delete_all(&self) -> Result<(), ReactionError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ReactionService<S: ReactionStore> {
    store: S,
    config: Arc<BotConfig>,
}

impl<S: ReactionStore> ReactionService<S> {
    pub fn new(store: S, config: Arc<BotConfig>) -> Self {
        Self { store, config }
    }

    /// A reaction counts only when it uses the target emoji inside a monitored channel.
    pub fn is_qualifying(&self, emoji_name: Option<&str>, channel_id: u64) -> bool {
        emoji_name == Some(self.config.target_emoji_name.as_str())
            && self.config.is_monitored_channel(channel_id)
    }

    /// Credit one reaction to the author of the reacted-to message.
    pub async fn record_reaction(&self, author_id: u64) -> Result<u64, ReactionError> {
        if author_id == 0 {
            return Err(ReactionError::InvalidId);
        }
        self.store.increment(author_id).await
    }

    #[cfg(test)]
    pub async fn count_for(&self, user_id: u64) -> Result<u64, ReactionError> {
        Ok(self
            .store
            .find_one(user_id)
            .await?
            .map(|record| record.count)
            .unwrap_or(0))
    }

    pub async fn top(&self, limit: usize) -> Result<Vec<ReactionCount>, ReactionError> {
        self.store.top(limit).await
    }

    /// Wipe every record. Used by `cleardb` and the yearly reset.
    pub async fn clear(&self) -> Result<(), ReactionError> {
        self.store.delete_all().await
    }
}
