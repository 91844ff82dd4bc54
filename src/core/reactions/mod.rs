pub mod reaction_service;

pub use reaction_service::{ReactionCount, ReactionError, ReactionService, ReactionStore};
