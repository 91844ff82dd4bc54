// Turns the top reaction counts into a display-ready leaderboard document.
// The document is plain data; the Discord layer maps it onto an embed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;

use super::ChannelError;
use crate::core::config::{BotConfig, Branding};
use crate::core::reactions::ReactionCount;

/// How many entries the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

const MEDAL_MARKERS: [&str; 3] = [":first_place:", ":second_place:", ":third_place:"];
const GENERIC_MARKER: &str = "🏅";
const EMPTY_DESCRIPTION: &str = "No reactions recorded yet.";

/// Looks up the human-readable name for a user id.
#[async_trait]
pub trait DisplayNameResolver: Send + Sync {
    async fn display_name(&self, user_id: u64) -> Result<String, ChannelError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardDocument {
    pub title: String,
    pub author_name: String,
    pub author_icon_url: String,
    pub author_url: String,
    pub description: String,
    pub color: u32,
    pub thumbnail_url: String,
    pub footer: String,
}

impl LeaderboardDocument {
    /// Colour as `#rrggbb`.
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color)
    }

    #[cfg(test)]
    pub fn lines(&self) -> Vec<&str> {
        self.description.split("\n\n").collect()
    }
}

pub struct LeaderboardRenderer {
    branding: Branding,
    emoji_display: String,
    timezone: Tz,
}

impl LeaderboardRenderer {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            branding: config.branding.clone(),
            emoji_display: config.target_emoji_display.clone(),
            timezone: config.tz(),
        }
    }

    /// Render up to `LEADERBOARD_SIZE` records, already sorted highest first.
    /// A failed name lookup aborts the whole render.
    pub async fn render<R: DisplayNameResolver + ?Sized>(
        &self,
        records: &[ReactionCount],
        resolver: &R,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardDocument, ChannelError> {
        let mut lines = Vec::with_capacity(records.len().min(LEADERBOARD_SIZE));
        for (index, record) in records.iter().take(LEADERBOARD_SIZE).enumerate() {
            let name = resolver.display_name(record.user_id).await?;
            lines.push(format!(
                "{} {}. {} - {}x {}",
                rank_marker(index),
                index + 1,
                name,
                record.count,
                self.emoji_display
            ));
        }

        let description = if lines.is_empty() {
            EMPTY_DESCRIPTION.to_string()
        } else {
            lines.join("\n\n")
        };

        Ok(LeaderboardDocument {
            title: self.branding.title.clone(),
            author_name: self.branding.author_name.clone(),
            author_icon_url: self.branding.author_icon_url.clone(),
            author_url: self.branding.author_url.clone(),
            description,
            color: random_color(),
            thumbnail_url: self.branding.thumbnail_url.clone(),
            footer: format!(
                "Latest Updated - {}",
                now.with_timezone(&self.timezone).format("%d/%m/%Y")
            ),
        })
    }
}

/// Zero-based position -> marker. Top three get medals.
pub fn rank_marker(index: usize) -> &'static str {
    MEDAL_MARKERS.get(index).copied().unwrap_or(GENERIC_MARKER)
}

fn random_color() -> u32 {
    rand::thread_rng().gen_range(0..=0xFF_FF_FF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct MentionResolver;

    #[async_trait]
    impl DisplayNameResolver for MentionResolver {
        async fn display_name(&self, user_id: u64) -> Result<String, ChannelError> {
            Ok(format!("user{}", user_id))
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl DisplayNameResolver for FailingResolver {
        async fn display_name(&self, _: u64) -> Result<String, ChannelError> {
            Err(ChannelError::Platform("Unknown User".to_string()))
        }
    }

    fn renderer() -> LeaderboardRenderer {
        LeaderboardRenderer::new(&BotConfig::default())
    }

    #[tokio::test]
    async fn renders_ten_ranked_lines() {
        let counts = [50, 40, 30, 20, 10, 9, 8, 7, 6, 5];
        let records: Vec<ReactionCount> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ReactionCount {
                user_id: i as u64 + 1,
                count,
            })
            .collect();

        let doc = renderer()
            .render(&records, &MentionResolver, Utc::now())
            .await
            .unwrap();
        let lines = doc.lines();

        assert_eq!(lines.len(), 10);
        assert_eq!(
            lines[0],
            ":first_place: 1. user1 - 50x <:haha:487642499104374784>"
        );
        assert!(lines[1].starts_with(":second_place: 2. user2 - 40x"));
        assert!(lines[2].starts_with(":third_place: 3. user3 - 30x"));
        for (i, line) in lines.iter().enumerate().skip(3) {
            let expected = format!("🏅 {}. user{} - {}x", i + 1, i + 1, counts[i]);
            assert!(line.starts_with(&expected), "line {} was {}", i, line);
        }
    }

    #[tokio::test]
    async fn footer_uses_configured_timezone() {
        // 20:00 UTC on Dec 31 is already Jan 1 in Jakarta (UTC+7)
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        let doc = renderer().render(&[], &MentionResolver, now).await.unwrap();

        assert_eq!(doc.footer, "Latest Updated - 01/01/2025");
    }

    #[tokio::test]
    async fn carries_branding_and_valid_color() {
        let doc = renderer()
            .render(&[], &MentionResolver, Utc::now())
            .await
            .unwrap();

        assert_eq!(doc.title, "Top Global Penghibur");
        assert_eq!(doc.author_url, "https://discord.gg/netizen");
        assert_eq!(doc.description, EMPTY_DESCRIPTION);
        assert!(doc.color <= 0xFF_FF_FF);
        assert_eq!(doc.color_hex().len(), 7);
    }

    #[test]
    fn color_hex_is_zero_padded() {
        let doc = LeaderboardDocument {
            title: String::new(),
            author_name: String::new(),
            author_icon_url: String::new(),
            author_url: String::new(),
            description: String::new(),
            color: 0x00_0A_FF,
            thumbnail_url: String::new(),
            footer: String::new(),
        };
        assert_eq!(doc.color_hex(), "#000aff");
    }

    #[tokio::test]
    async fn name_lookup_failure_aborts_render() {
        let records = vec![ReactionCount {
            user_id: 1,
            count: 3,
        }];
        let result = renderer()
            .render(&records, &FailingResolver, Utc::now())
            .await;

        assert!(matches!(result, Err(ChannelError::Platform(_))));
    }

    #[test]
    fn rank_markers() {
        assert_eq!(rank_marker(0), ":first_place:");
        assert_eq!(rank_marker(2), ":third_place:");
        assert_eq!(rank_marker(3), "🏅");
        assert_eq!(rank_marker(9), "🏅");
    }
}
