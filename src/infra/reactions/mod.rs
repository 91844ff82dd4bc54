// Implementations of ReactionStore.

#[cfg(test)]
pub mod in_memory;
pub mod sqlite_store;

#[cfg(test)]
pub use in_memory::InMemoryReactionStore;
pub use sqlite_store::SqliteReactionStore;
