// This is the entry point of the reaction leaderboard bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases)
// - `discord/` = Discord-specific adapters (events, output channel)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Arm the leaderboard schedule once the bot is ready

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::config::BotConfig;
use crate::core::leaderboard::{LeaderboardPublisher, LeaderboardRenderer, LeaderboardScheduler};
use crate::core::reactions::ReactionService;
use crate::discord::admin_messages::handle_message;
use crate::discord::leaderboard_channel::DiscordLeaderboardChannel;
use crate::discord::presence;
use crate::discord::reaction_events::handle_reaction_add;
use crate::discord::{Data, Error};
use crate::infra::reactions::SqliteReactionStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for the two events the bot cares about.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(e) = handle_reaction_add(ctx, data, add_reaction).await {
                tracing::error!("Error processing reaction: {}", e);
            }
        }
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = handle_message(ctx, data, new_message).await {
                tracing::error!("Error handling admin command: {}", e);
            }
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // Keep runtime files in a dedicated folder so the repo root stays tidy.
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "data/reactions.db".to_string());
    let config_path = std::env::var("LEADERBOARD_CONFIG")
        .unwrap_or_else(|_| "data/leaderboard_config.json".to_string());

    let config = Arc::new(
        BotConfig::load(&config_path).expect("Invalid leaderboard configuration"),
    );
    tracing::info!(
        leaderboard_channel = config.leaderboard_channel_id,
        monitored_channels = config.monitored_channel_ids.len(),
        timezone = %config.timezone,
        "Loaded configuration from {}",
        config_path
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let reaction_store = SqliteReactionStore::new(&database_url)
        .await
        .expect("Failed to initialize SQLite store");
    tracing::info!("Connected to reaction database at {}", database_url);

    let reaction_service = Arc::new(ReactionService::new(reaction_store, Arc::clone(&config)));

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read command bodies
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}!", ready.user.name);
                presence::on_ready(ctx, &config);

                // The output channel needs the live HTTP client, so the publisher is built here
                let channel =
                    DiscordLeaderboardChannel::new(ctx.http.clone(), config.leaderboard_channel_id);
                let publisher = Arc::new(LeaderboardPublisher::new(
                    Arc::clone(&reaction_service),
                    channel,
                    LeaderboardRenderer::new(&config),
                ));

                let scheduler = LeaderboardScheduler::new(Arc::clone(&publisher), config.tz());
                tokio::spawn(scheduler.arm());

                Ok(Data {
                    config,
                    reactions: reaction_service,
                    publisher,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
