// Text commands for allow-listed maintainers.
//
// Parsing and authorization are pure so the Discord handler only has to
// translate the decision into side effects.

use crate::core::config::BotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// `cleardb` - wipe every reaction count. Needs Administrator.
    ClearDatabase,
    /// `reload` - republish the leaderboard now.
    Reload,
}

impl AdminCommand {
    /// Whole-body, case-insensitive match. Anything else is not a command.
    pub fn parse(body: &str) -> Option<Self> {
        if body.eq_ignore_ascii_case("cleardb") {
            Some(Self::ClearDatabase)
        } else if body.eq_ignore_ascii_case("reload") {
            Some(Self::Reload)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandDecision {
    /// Not from an allow-listed user, or not a command. No reply.
    Ignore,
    /// Allow-listed but missing the Administrator permission.
    Deny,
    Execute(AdminCommand),
}

pub const CLEARED_REPLY: &str = "Database cleared successfully.";
pub const DENIED_REPLY: &str = "You do not have permission to clear the database.";

/// Decide what to do with a message. `is_admin` is only consulted for `cleardb`,
/// so callers may compute it lazily via `needs_admin_check`.
pub fn decide(config: &BotConfig, author_id: u64, body: &str, is_admin: bool) -> CommandDecision {
    if !config.is_allowed_user(author_id) {
        return CommandDecision::Ignore;
    }

    match AdminCommand::parse(body) {
        Some(AdminCommand::ClearDatabase) if !is_admin => CommandDecision::Deny,
        Some(command) => CommandDecision::Execute(command),
        None => CommandDecision::Ignore,
    }
}

/// True when the decision depends on the author's Administrator permission.
pub fn needs_admin_check(config: &BotConfig, author_id: u64, body: &str) -> bool {
    config.is_allowed_user(author_id)
        && AdminCommand::parse(body) == Some(AdminCommand::ClearDatabase)
}

/// Administrator check from raw guild data, for when no cached guild is at hand.
/// The owner always qualifies; otherwise some role the member holds must grant
/// Administrator. The @everyone role shares the guild's id and every member holds it.
pub fn is_guild_admin(
    user_id: u64,
    owner_id: u64,
    guild_id: u64,
    member_role_ids: &[u64],
    admin_role_ids: &[u64],
) -> bool {
    user_id == owner_id
        || admin_role_ids
            .iter()
            .any(|role| *role == guild_id || member_role_ids.contains(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: u64 = 586463558427213834;
    const STRANGER: u64 = 42;

    #[test]
    fn parse_is_case_insensitive_exact_match() {
        assert_eq!(AdminCommand::parse("cleardb"), Some(AdminCommand::ClearDatabase));
        assert_eq!(AdminCommand::parse("ClearDB"), Some(AdminCommand::ClearDatabase));
        assert_eq!(AdminCommand::parse("RELOAD"), Some(AdminCommand::Reload));
        assert_eq!(AdminCommand::parse(" reload"), None);
        assert_eq!(AdminCommand::parse("reload now"), None);
        assert_eq!(AdminCommand::parse(""), None);
    }

    #[test]
    fn strangers_are_ignored_even_as_admins() {
        let config = BotConfig::default();
        assert_eq!(decide(&config, STRANGER, "cleardb", true), CommandDecision::Ignore);
        assert_eq!(decide(&config, STRANGER, "reload", true), CommandDecision::Ignore);
        assert!(!needs_admin_check(&config, STRANGER, "cleardb"));
    }

    #[test]
    fn cleardb_without_admin_is_denied() {
        let config = BotConfig::default();
        assert!(needs_admin_check(&config, ALLOWED, "cleardb"));
        assert_eq!(decide(&config, ALLOWED, "cleardb", false), CommandDecision::Deny);
        assert_eq!(
            decide(&config, ALLOWED, "cleardb", true),
            CommandDecision::Execute(AdminCommand::ClearDatabase)
        );
    }

    #[test]
    fn reload_only_needs_the_allow_list() {
        let config = BotConfig::default();
        assert!(!needs_admin_check(&config, ALLOWED, "reload"));
        assert_eq!(
            decide(&config, ALLOWED, "Reload", false),
            CommandDecision::Execute(AdminCommand::Reload)
        );
    }

    #[test]
    fn ordinary_chatter_is_ignored() {
        let config = BotConfig::default();
        assert_eq!(decide(&config, ALLOWED, "haha nice", true), CommandDecision::Ignore);
    }

    const GUILD: u64 = 487000000000000000;
    const MOD_ROLE: u64 = 900;
    const ADMIN_ROLE: u64 = 901;

    #[test]
    fn guild_owner_is_admin_without_roles() {
        assert!(is_guild_admin(ALLOWED, ALLOWED, GUILD, &[], &[]));
    }

    #[test]
    fn admin_role_grants_admin() {
        assert!(is_guild_admin(ALLOWED, STRANGER, GUILD, &[MOD_ROLE, ADMIN_ROLE], &[ADMIN_ROLE]));
        assert!(!is_guild_admin(ALLOWED, STRANGER, GUILD, &[MOD_ROLE], &[ADMIN_ROLE]));
    }

    #[test]
    fn everyone_role_with_admin_covers_all_members() {
        assert!(is_guild_admin(ALLOWED, STRANGER, GUILD, &[], &[GUILD]));
    }
}
