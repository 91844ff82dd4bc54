// Publish/reset schedule for the leaderboard.
//
// Arming the scheduler publishes once right away, then spawns three tasks
// that live for the rest of the process:
// - a plain 24h interval (drifts with uptime)
// - a daily rule at 00:00 in the configured timezone
// - a yearly rule at 00:00 on January 1 that wipes all counts
// Triggers missed while the process was down are not replayed.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use super::leaderboard_publisher::{LeaderboardChannel, LeaderboardPublisher};
use super::leaderboard_renderer::DisplayNameResolver;
use crate::core::reactions::ReactionStore;

const REPUBLISH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

type Clock = fn() -> DateTime<Utc>;

pub struct LeaderboardScheduler<S, C>
where
    S: ReactionStore + 'static,
    C: LeaderboardChannel + DisplayNameResolver + 'static,
{
    publisher: Arc<LeaderboardPublisher<S, C>>,
    timezone: Tz,
    clock: Clock,
}

impl<S, C> LeaderboardScheduler<S, C>
where
    S: ReactionStore + 'static,
    C: LeaderboardChannel + DisplayNameResolver + 'static,
{
    pub fn new(publisher: Arc<LeaderboardPublisher<S, C>>, timezone: Tz) -> Self {
        Self {
            publisher,
            timezone,
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Publish now and start the background triggers. There is no way to disarm.
    pub async fn arm(self) {
        publish_logged(&self.publisher, "startup").await;

        self.spawn_interval();
        self.spawn_daily();
        self.spawn_yearly_reset();
    }

    fn spawn_interval(&self) -> JoinHandle<()> {
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + REPUBLISH_INTERVAL, REPUBLISH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                publish_logged(&publisher, "interval").await;
            }
        })
    }

    fn spawn_daily(&self) -> JoinHandle<()> {
        let publisher = Arc::clone(&self.publisher);
        let timezone = self.timezone;
        let clock = self.clock;
        tokio::spawn(async move {
            // The target is carried forward, so an early wake-up can't fire the same midnight twice
            let mut next = next_daily_midnight(clock().with_timezone(&timezone));
            while let Some(target) = next {
                sleep(until(clock().with_timezone(&timezone), target)).await;
                publish_logged(&publisher, "daily").await;
                next = next_daily_midnight(target);
            }
            tracing::error!("Could not compute next daily midnight; daily rule stopped");
        })
    }

    fn spawn_yearly_reset(&self) -> JoinHandle<()> {
        let publisher = Arc::clone(&self.publisher);
        let timezone = self.timezone;
        let clock = self.clock;
        tokio::spawn(async move {
            let mut next = next_new_year(clock().with_timezone(&timezone));
            while let Some(target) = next {
                tracing::info!(next = %target, "Yearly leaderboard reset scheduled");
                sleep(until(clock().with_timezone(&timezone), target)).await;
                reset(&publisher, timezone).await;
                next = next_new_year(target);
            }
            tracing::error!("Could not compute next new year; yearly reset stopped");
        })
    }
}

async fn publish_logged<S, C>(publisher: &LeaderboardPublisher<S, C>, trigger: &str)
where
    S: ReactionStore,
    C: LeaderboardChannel + DisplayNameResolver,
{
    if let Err(e) = publisher.publish().await {
        tracing::error!(trigger, "Error updating leaderboard: {}", e);
    }
}

/// The yearly reset: clear every count.
pub async fn reset<S, C>(publisher: &LeaderboardPublisher<S, C>, timezone: Tz)
where
    S: ReactionStore,
    C: LeaderboardChannel + DisplayNameResolver,
{
    match publisher.reactions().clear().await {
        Ok(()) => tracing::info!(
            "[ {} ] Leaderboard reset.",
            Utc::now().with_timezone(&timezone).format("%H:%M:%S")
        ),
        Err(e) => tracing::error!("Error resetting leaderboard: {}", e),
    }
}

fn until(now: DateTime<Tz>, next: DateTime<Tz>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// The next 00:00 strictly after `now`, in `now`'s timezone.
pub fn next_daily_midnight(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tomorrow = now.date_naive().checked_add_days(Days::new(1))?;
    local_midnight(now.timezone(), tomorrow)
}

/// 00:00 on the next January 1 strictly after `now`.
pub fn next_new_year(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let date = NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)?;
    local_midnight(now.timezone(), date)
}

fn local_midnight(timezone: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    // Zones that spring forward at midnight skip 00:00; fire at 01:00 instead
    timezone
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            timezone
                .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
                .earliest()
        })
}
