//! Cache interface
//!
//! The registrar talks to its cache backend through this trait: values are
//! stored as JSON with no TTL and evicted explicitly on invalidation. Only
//! the in-memory backend ships here; anything key-value shaped (Redis,
//! memcached) can implement the trait in the embedding application.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key-value cache with store-forever semantics.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get the cached value for a key, if any.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store a value under a key with no expiry.
    async fn put_forever(&self, key: &str, value: serde_json::Value);

    /// Evict a key.
    async fn forget(&self, key: &str);
}

/// In-memory [`Cache`] implementation.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key currently has a cached value.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put_forever(&self, key: &str, value: serde_json::Value) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn forget(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
