use std::fmt::Display;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;

/// Identity of an upstream request: endpoint path plus its query string
///
/// Parameters are serialized in the order given, so `a=1&b=2` and `b=2&a=1`
/// are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from an endpoint and ordered query parameters
    pub fn request<K, V>(endpoint: &str, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key.as_ref(), value.as_ref());
        }
        Self(format!("{}?{}", endpoint.trim_matches('/'), query.finish()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    stored_at: Instant,
}

/// In-memory TTL cache for upstream JSON responses
///
/// Expired entries are not served by [`TtlCache::get`] but are kept around so a
/// failing upstream can still be answered from [`TtlCache::get_stale`]. Once the
/// map grows past its capacity, expired entries are purged and then the oldest
/// remaining entry is evicted.
#[derive(Debug)]
pub struct TtlCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl TtlCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload if present and younger than the TTL
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Returns the payload regardless of its age
    pub fn get_stale(&self, key: &CacheKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    /// Stores a payload with a fresh timestamp, overwriting any previous entry
    pub fn set(&self, key: CacheKey, payload: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );

        if self.entries.len() > self.capacity {
            self.evict();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.stored_at)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(key) => {
                    tracing::debug!(key = %key, "Evicting oldest cache entry");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
