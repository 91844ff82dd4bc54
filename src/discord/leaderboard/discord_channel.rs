// Discord-backed output channel for the leaderboard.
//
// Implements the core's LeaderboardChannel and DisplayNameResolver ports on
// top of serenity's HTTP client, and maps the platform-agnostic document onto
// an embed.

use crate::core::leaderboard::{
    ChannelError, DisplayNameResolver, LeaderboardChannel, LeaderboardDocument,
};
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use std::sync::Arc;

/// Discord JSON error code for "Unknown Message".
const UNKNOWN_MESSAGE: isize = 10008;

pub struct DiscordLeaderboardChannel {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl DiscordLeaderboardChannel {
    /// `channel_id` must be non-zero; `BotConfig::validate` guarantees that.
    pub fn new(http: Arc<serenity::Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: serenity::ChannelId::new(channel_id),
        }
    }
}

#[async_trait]
impl LeaderboardChannel for DiscordLeaderboardChannel {
    async fn delete_document(&self, document_id: u64) -> Result<(), ChannelError> {
        self.channel_id
            .delete_message(&self.http, serenity::MessageId::new(document_id))
            .await
            .map_err(to_channel_error)
    }

    async fn send_document(&self, document: &LeaderboardDocument) -> Result<u64, ChannelError> {
        let message = self
            .channel_id
            .send_message(
                &self.http,
                serenity::CreateMessage::new().embed(build_embed(document)),
            )
            .await
            .map_err(to_channel_error)?;

        Ok(message.id.get())
    }
}

#[async_trait]
impl DisplayNameResolver for DiscordLeaderboardChannel {
    async fn display_name(&self, user_id: u64) -> Result<String, ChannelError> {
        let user = self
            .http
            .get_user(serenity::UserId::new(user_id))
            .await
            .map_err(to_channel_error)?;

        Ok(user.name)
    }
}

fn to_channel_error(err: serenity::Error) -> ChannelError {
    match &err {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.error.code == UNKNOWN_MESSAGE =>
        {
            ChannelError::DocumentNotFound
        }
        _ => ChannelError::Platform(err.to_string()),
    }
}

pub fn build_embed(document: &LeaderboardDocument) -> CreateEmbed {
    CreateEmbed::new()
        .author(
            CreateEmbedAuthor::new(&document.author_name)
                .icon_url(&document.author_icon_url)
                .url(&document.author_url),
        )
        .title(&document.title)
        .description(&document.description)
        .color(document.color)
        .thumbnail(&document.thumbnail_url)
        .footer(CreateEmbedFooter::new(&document.footer))
}
