// One publish cycle: delete old -> query -> render -> send new -> remember id.
//
// The publisher owns the id of the document it last sent. The lock around it
// is only taken to read or overwrite the id, never across platform calls, so
// overlapping cycles behave exactly like two independent runs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use super::leaderboard_renderer::{
    DisplayNameResolver, LeaderboardDocument, LeaderboardRenderer, LEADERBOARD_SIZE,
};
use super::ChannelError;
use crate::core::reactions::{ReactionError, ReactionService, ReactionStore};

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error(transparent)]
    Storage(#[from] ReactionError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// The fixed output channel the leaderboard lives in.
#[async_trait]
pub trait LeaderboardChannel: Send + Sync {
    /// Returns `ChannelError::DocumentNotFound` if it is already gone.
    async fn delete_document(&self, document_id: u64) -> Result<(), ChannelError>;

    /// Returns the id of the sent document.
    async fn send_document(&self, document: &LeaderboardDocument) -> Result<u64, ChannelError>;
}

pub struct LeaderboardPublisher<S, C>
where
    S: ReactionStore,
    C: LeaderboardChannel + DisplayNameResolver,
{
    reactions: Arc<ReactionService<S>>,
    channel: C,
    renderer: LeaderboardRenderer,
    last_document_id: Mutex<Option<u64>>,
}

impl<S, C> LeaderboardPublisher<S, C>
where
    S: ReactionStore,
    C: LeaderboardChannel + DisplayNameResolver,
{
    pub fn new(reactions: Arc<ReactionService<S>>, channel: C, renderer: LeaderboardRenderer) -> Self {
        Self {
            reactions,
            channel,
            renderer,
            last_document_id: Mutex::new(None),
        }
    }

    pub fn reactions(&self) -> &Arc<ReactionService<S>> {
        &self.reactions
    }

    pub async fn last_document_id(&self) -> Option<u64> {
        *self.last_document_id.lock().await
    }

    /// Run one publish cycle. Returns the id of the new leaderboard document.
    pub async fn publish(&self) -> Result<u64, LeaderboardError> {
        let previous = self.last_document_id().await;
        if let Some(document_id) = previous {
            match self.channel.delete_document(document_id).await {
                Ok(()) => tracing::debug!(document_id, "Deleted previous leaderboard"),
                Err(ChannelError::DocumentNotFound) => {}
                Err(e) => tracing::error!(
                    document_id,
                    "Error deleting previous leaderboard message: {}",
                    e
                ),
            }
        }

        let top = self.reactions.top(LEADERBOARD_SIZE).await?;
        let document = self.renderer.render(&top, &self.channel, Utc::now()).await?;
        let document_id = self.channel.send_document(&document).await?;

        *self.last_document_id.lock().await = Some(document_id);
        tracing::info!(
            document_id,
            entries = top.len(),
            color = %document.color_hex(),
            "Published leaderboard"
        );

        Ok(document_id)
    }
}
