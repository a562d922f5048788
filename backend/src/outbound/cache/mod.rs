//! Process-local entity cache adapter.
//!
//! Backs the `EntityCache` port with a plain `RwLock<HashMap>`. There is no
//! TTL: the workflow services invalidate explicitly on every mutation, so an
//! entry only lives until the next write to its entity. A Redis-backed
//! adapter can replace this behind the same port for multi-process
//! deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{CacheKey, EntityCache};

/// In-memory cache for a single entity type.
#[derive(Debug, Default)]
pub struct InMemoryCache<T> {
    entries: RwLock<HashMap<CacheKey, T>>,
}

impl<T> InMemoryCache<T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> EntityCache<T> for InMemoryCache<T> {
    async fn get(&self, key: &CacheKey) -> Option<T> {
        // A poisoned lock degrades to a miss rather than taking reads down.
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    async fn put(&self, key: &CacheKey, value: T) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.clone(), value);
        }
    }

    async fn invalidate(&self, key: &CacheKey) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}
