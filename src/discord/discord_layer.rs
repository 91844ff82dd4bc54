// Discord layer - event handlers and the Discord-backed leaderboard channel.

#[path = "commands/admin_messages.rs"]
pub mod admin_messages;

#[path = "leaderboard/discord_channel.rs"]
pub mod leaderboard_channel;

#[path = "presence.rs"]
pub mod presence;

#[path = "reactions/reaction_events.rs"]
pub mod reaction_events;

use crate::core::config::BotConfig;
use crate::core::leaderboard::LeaderboardPublisher;
use crate::core::reactions::ReactionService;
use crate::infra::reactions::SqliteReactionStore;
use leaderboard_channel::DiscordLeaderboardChannel;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type Publisher = LeaderboardPublisher<SqliteReactionStore, DiscordLeaderboardChannel>;

/// Shared state handed to every event handler.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub reactions: Arc<ReactionService<SqliteReactionStore>>,
    pub publisher: Arc<Publisher>,
}
