// Static configuration for the leaderboard bot.
//
// Everything that used to be a scattered literal (channel ids, the admin
// allow-list, the emoji we count, embed branding) lives in one struct that is
// loaded and validated once at startup, then shared read-only.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Branding shown on every leaderboard embed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Branding {
    pub title: String,
    pub author_name: String,
    pub author_icon_url: String,
    pub author_url: String,
    pub thumbnail_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        let icon = "https://cdn.discordapp.com/icons/274510773194063872/a_c058ecc8ecbb4394d96acf23a85f04a5";
        Self {
            title: "Top Global Penghibur".to_string(),
            author_name: "N E T I Z Ξ N | Server HaHa HiHi.".to_string(),
            author_icon_url: icon.to_string(),
            author_url: "https://discord.gg/netizen".to_string(),
            thumbnail_url: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    /// Where the leaderboard embed gets published.
    pub leaderboard_channel_id: u64,
    /// Reactions only count inside these channels.
    pub monitored_channel_ids: HashSet<u64>,
    /// Users allowed to run `cleardb` / `reload`.
    pub allowed_user_ids: HashSet<u64>,
    /// Emoji name matched against incoming reactions.
    pub target_emoji_name: String,
    /// How the emoji is rendered in leaderboard lines (custom emoji markup).
    pub target_emoji_display: String,
    /// IANA timezone used for log timestamps, the footer date and the daily rules.
    pub timezone: String,
    pub branding: Branding,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            leaderboard_channel_id: 1249720217660031016,
            monitored_channel_ids: HashSet::from([
                616950964431093761,
                619846700915228673,
                501001154851897354,
                689765145563365407,
                695214936443322439,
            ]),
            allowed_user_ids: HashSet::from([586463558427213834, 387912099520577547]),
            target_emoji_name: "haha".to_string(),
            target_emoji_display: "<:haha:487642499104374784>".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            branding: Branding::default(),
        }
    }
}

impl BotConfig {
    /// Load the config from a JSON file, falling back to the built-in defaults
    /// when the file does not exist. Missing keys also take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(file)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard_channel_id == 0 {
            return Err(ConfigError::Invalid(
                "leaderboard_channel_id must be set".to_string(),
            ));
        }
        if self.monitored_channel_ids.is_empty() || self.monitored_channel_ids.contains(&0) {
            return Err(ConfigError::Invalid(
                "monitored_channel_ids must contain at least one non-zero id".to_string(),
            ));
        }
        if self.allowed_user_ids.is_empty() || self.allowed_user_ids.contains(&0) {
            return Err(ConfigError::Invalid(
                "allowed_user_ids must contain at least one non-zero id".to_string(),
            ));
        }
        if self.target_emoji_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "target_emoji_name must not be empty".to_string(),
            ));
        }
        if self.timezone.parse::<Tz>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown timezone '{}'",
                self.timezone
            )));
        }
        Ok(())
    }

    /// Parsed timezone. `validate` guarantees this parses; UTC is only a fallback.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }

    pub fn is_monitored_channel(&self, channel_id: u64) -> bool {
        self.monitored_channel_ids.contains(&channel_id)
    }

    pub fn is_allowed_user(&self, user_id: u64) -> bool {
        self.allowed_user_ids.contains(&user_id)
    }
}
