use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// Default freshness window for lookup results.
pub const DEFAULT_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

/// Lookup results keyed by request (zip code, rate product, ...), each
/// stamped with the time it was fetched. The caller supplies `now`, so the
/// cache never reads the clock itself.
#[derive(Debug, Clone)]
pub struct LookupCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> LookupCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        LookupCache {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// The value for `key` if it was fetched less than one TTL before `now`.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    /// Drop every entry that is no longer fresh at `now`; returns how many.
    pub fn purge_stale(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> Default for LookupCache<K, V> {
    fn default() -> Self {
        LookupCache::new(Duration::minutes(DEFAULT_TTL_MINUTES))
    }
}
