//! Bounded in-memory intel cache
//!
//! Thread-safe memoization for expensive cross-source lookups (repeated
//! identity/reputation checks within a short window). DashMap for concurrent
//! access without lock contention.
//!
//! The cache is an explicit object passed into detectors by reference:
//! capacity and TTL are constructor parameters, never ambient module state.
//! At capacity, the oldest entry is evicted.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::signal::Signal;

const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone, Debug)]
struct CacheEntry {
    signals: Vec<Signal>,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Fixed-capacity, TTL-bounded cache of intel lookups keyed by subject.
#[derive(Clone)]
pub struct IntelCache {
    store: Arc<DashMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for IntelCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL_SECS)
    }
}

impl IntelCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
            ttl: Duration::from_secs(ttl_secs),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn normalize_key(key: &str) -> String {
        key.to_lowercase()
    }

    /// Get with TTL validation. Expired entries are removed on access.
    pub fn get(&self, key: &str) -> Option<Vec<Signal>> {
        let key = Self::normalize_key(key);

        match self.store.get(&key) {
            Some(entry) if entry.is_expired(self.ttl) => {
                drop(entry); // release read lock before removing
                self.store.remove(&key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("cache MISS (expired): {}", key);
                None
            }
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("cache HIT: {}", key);
                Some(entry.signals.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("cache MISS: {}", key);
                None
            }
        }
    }

    /// Insert, evicting the oldest entry when at capacity.
    pub fn insert(&self, key: &str, signals: Vec<Signal>) {
        let key = Self::normalize_key(key);

        if self.store.len() >= self.capacity && !self.store.contains_key(&key) {
            self.evict_oldest();
        }

        self.store.insert(
            key,
            CacheEntry {
                signals,
                created_at: Instant::now(),
            },
        );
    }

    fn evict_oldest(&self) {
        let oldest = self
            .store
            .iter()
            .min_by_key(|e| e.value().created_at)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.store.remove(&key);
            debug!("cache EVICT (capacity): {}", key);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            entries: self.store.len(),
            capacity: self.capacity,
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signal::SignalCategory;

    fn mock_signals() -> Vec<Signal> {
        vec![Signal::new(
            SignalCategory::ExternalIntel,
            "ATTACK_PATTERN_MATCH",
            40.0,
            0.9,
            "test hit",
            "external_intel",
        )]
    }

    #[test]
    fn test_set_get() {
        let cache = IntelCache::new(16, 300);
        cache.insert("0xDEAD", mock_signals());
        assert!(cache.get("0xdead").is_some()); // case-normalized
        assert!(cache.get("0xbeef").is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = IntelCache::new(2, 300);
        cache.insert("a", mock_signals());
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("b", mock_signals());
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("c", mock_signals());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none(), "oldest entry should be evicted");
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = IntelCache::new(16, 0); // everything expires immediately
        cache.insert("a", mock_signals());
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_stats() {
        let cache = IntelCache::new(16, 300);
        cache.insert("a", mock_signals());
        cache.get("a"); // hit
        cache.get("b"); // miss
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }
}
