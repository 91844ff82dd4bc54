pub mod admin_commands;

pub use admin_commands::{decide, is_guild_admin, needs_admin_check, AdminCommand, CommandDecision};
