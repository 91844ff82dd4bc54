// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "commands/mod.rs"]
pub mod commands;

#[path = "config/mod.rs"]
pub mod config;

#[path = "leaderboard/mod.rs"]
pub mod leaderboard;

#[path = "reactions/mod.rs"]
pub mod reactions;
