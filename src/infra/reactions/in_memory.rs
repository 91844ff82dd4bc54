// In-memory ReactionStore backed by DashMap.
// Used by the core tests so they don't need a database.

use crate::core::reactions::{ReactionCount, ReactionError, ReactionStore};
use async_trait::async_trait;
use dashmap::DashMap;

pub struct InMemoryReactionStore {
    /// Maps user_id -> count
    data: DashMap<u64, u64>,
}

impl InMemoryReactionStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }
}

#[async_trait]
impl ReactionStore for InMemoryReactionStore {
    async fn increment(&self, user_id: u64) -> Result<u64, ReactionError> {
        // entry() holds the shard lock, so concurrent increments can't lose updates
        let mut entry = self.data.entry(user_id).or_insert(0);
        *entry = entry.saturating_add(1);
        Ok(*entry)
    }

    async fn find_one(&self, user_id: u64) -> Result<Option<ReactionCount>, ReactionError> {
        Ok(self.data.get(&user_id).map(|count| ReactionCount {
            user_id,
            count: *count,
        }))
    }

    async fn top(&self, limit: usize) -> Result<Vec<ReactionCount>, ReactionError> {
        let mut records: Vec<ReactionCount> = self
            .data
            .iter()
            .map(|entry| ReactionCount {
                user_id: *entry.key(),
                count: *entry.value(),
            })
            .collect();

        // Stable sort: ties keep map iteration order
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(limit);
        Ok(records)
    }

    async fn delete_all(&self) -> Result<(), ReactionError> {
        self.data.clear();
        Ok(())
    }
}

impl Default for InMemoryReactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn increment_creates_then_adds() {
        let store = InMemoryReactionStore::new();
        assert_eq!(store.find_one(5).await.unwrap(), None);

        assert_eq!(store.increment(5).await.unwrap(), 1);
        assert_eq!(store.increment(5).await.unwrap(), 2);
        assert_eq!(
            store.find_one(5).await.unwrap(),
            Some(ReactionCount {
                user_id: 5,
                count: 2
            })
        );
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryReactionStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.increment(1).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.find_one(1).await.unwrap().unwrap().count, 50);
    }

    #[tokio::test]
    async fn top_sorts_descending_and_limits() {
        let store = InMemoryReactionStore::new();
        for (user, times) in [(1u64, 3), (2, 7), (3, 1), (4, 5)] {
            for _ in 0..times {
                store.increment(user).await.unwrap();
            }
        }

        let top = store.top(3).await.unwrap();
        let users: Vec<u64> = top.iter().map(|r| r.user_id).collect();
        assert_eq!(users, vec![2, 4, 1]);
    }
}
