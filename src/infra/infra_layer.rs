// The infra module contains implementations of core traits.

#[path = "reactions/mod.rs"]
pub mod reactions;
