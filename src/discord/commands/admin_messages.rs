// Plain-text admin commands (`cleardb`, `reload`).
//
// These are message bodies rather than slash commands, so they arrive through
// the message-created event. Authorization rules live in core; this layer
// looks up the author's permissions and performs the side effects.

use crate::core::commands::admin_commands::{CLEARED_REPLY, DENIED_REPLY};
use crate::core::commands::{decide, is_guild_admin, needs_admin_check, AdminCommand, CommandDecision};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub async fn handle_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    // Ignore bot messages (including our own)
    if message.author.bot {
        return Ok(());
    }

    let author_id = message.author.id.get();
    let body = message.content.as_str();

    // Only hit the API for permissions when the answer matters
    let is_admin = if needs_admin_check(&data.config, author_id, body) {
        author_is_admin(ctx, message).await?
    } else {
        false
    };

    match decide(&data.config, author_id, body, is_admin) {
        CommandDecision::Ignore => {}
        CommandDecision::Deny => {
            tracing::warn!(user_id = author_id, "cleardb denied: not an administrator");
            message.channel_id.say(&ctx.http, DENIED_REPLY).await?;
        }
        CommandDecision::Execute(AdminCommand::ClearDatabase) => {
            match data.reactions.clear().await {
                Ok(()) => {
                    tracing::info!(user_id = author_id, "Database cleared successfully.");
                    message.channel_id.say(&ctx.http, CLEARED_REPLY).await?;
                }
                Err(e) => tracing::error!("Error clearing database: {}", e),
            }
        }
        CommandDecision::Execute(AdminCommand::Reload) => {
            tracing::info!(user_id = author_id, "Manual leaderboard reload");
            if let Err(e) = data.publisher.publish().await {
                tracing::error!("Error updating leaderboard: {}", e);
            }
        }
    }

    Ok(())
}

/// Administrator in the guild the message was sent in. DMs never qualify.
async fn author_is_admin(ctx: &serenity::Context, message: &serenity::Message) -> Result<bool, Error> {
    let Some(guild_id) = message.guild_id else {
        return Ok(false);
    };

    let member = guild_id.member(ctx, message.author.id).await?;
    let cached = ctx
        .cache
        .guild(guild_id)
        .map(|guild| guild.member_permissions(&member).administrator());
    if let Some(is_admin) = cached {
        return Ok(is_admin);
    }

    tracing::warn!(
        guild_id = guild_id.get(),
        "Guild not cached, fetching it to check permissions"
    );
    let guild = guild_id.to_partial_guild(ctx).await?;
    let admin_role_ids: Vec<u64> = guild
        .roles
        .values()
        .filter(|role| role.permissions.administrator())
        .map(|role| role.id.get())
        .collect();
    let member_role_ids: Vec<u64> = member.roles.iter().map(|role| role.get()).collect();

    Ok(is_guild_admin(
        message.author.id.get(),
        guild.owner_id.get(),
        guild_id.get(),
        &member_role_ids,
        &admin_role_ids,
    ))
}
