// This module handles bot presence.
//
// Discord-layer glue: tells people in the member list what the bot is
// counting, so nobody has to ask why it reads every reaction.

use crate::core::config::BotConfig;
use poise::serenity_prelude as serenity;

pub fn status_text(config: &BotConfig) -> String {
    format!(":{}: reactions", config.target_emoji_name)
}

/// Called once the bot is ready.
pub fn on_ready(ctx: &serenity::Context, config: &BotConfig) {
    let activity = serenity::ActivityData::watching(status_text(config));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
