pub mod leaderboard_publisher;
pub mod leaderboard_renderer;
pub mod scheduler;

pub use leaderboard_publisher::{LeaderboardChannel, LeaderboardPublisher};
pub use leaderboard_renderer::{DisplayNameResolver, LeaderboardDocument, LeaderboardRenderer};
pub use scheduler::LeaderboardScheduler;

/// Failures talking to the chat platform.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Document not found")]
    DocumentNotFound,

    #[error("Platform error: {0}")]
    Platform(String),
}
