// Reaction-added handler: counts qualifying reactions for the message author.
//
// Discord-layer glue only. The decision of what counts lives in
// ReactionService; this file extracts ids from serenity types and logs.

use crate::core::config::BotConfig;
use crate::discord::{Data, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::future::Future;

pub async fn handle_reaction_add(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<(), Error> {
    if !data
        .reactions
        .is_qualifying(emoji_name(&reaction.emoji), reaction.channel_id.get())
    {
        return Ok(());
    }

    let author_id = resolve_author(reaction.message_author_id.map(|id| id.get()), || async move {
        let message = reaction.message(ctx).await?;
        Ok::<u64, Error>(message.author.id.get())
    })
    .await?;

    match data.reactions.record_reaction(author_id).await {
        Ok(count) => tracing::info!(
            user_id = author_id,
            count,
            "[ {} ] Counted reaction, leaderboard picks it up on the next update",
            local_time(&data.config)
        ),
        Err(e) => tracing::error!(user_id = author_id, "Error processing reaction: {}", e),
    }

    Ok(())
}

/// The gateway usually names the message author; older payloads don't, and
/// then the message has to be fetched.
async fn resolve_author<F, Fut>(known: Option<u64>, fetch: F) -> Result<u64, Error>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, Error>>,
{
    match known {
        Some(author_id) => Ok(author_id),
        None => fetch().await,
    }
}

/// Custom emoji match on their name, unicode emoji on the character itself.
fn emoji_name(emoji: &serenity::ReactionType) -> Option<&str> {
    match emoji {
        serenity::ReactionType::Custom { name, .. } => name.as_deref(),
        serenity::ReactionType::Unicode(unicode) => Some(unicode.as_str()),
        _ => None,
    }
}

fn local_time(config: &BotConfig) -> String {
    Utc::now()
        .with_timezone(&config.tz())
        .format("%H:%M:%S")
        .to_string()
}
