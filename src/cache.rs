//! Path lookup caching.
//!
//! [`ResolveCache`] is an LRU map from a normalized path to the index of the
//! route record it matched (or to "no record"). It is gated behind the
//! `cache` feature flag and uses the [`lru`] crate internally.
//!
//! The route table never changes after the router is created, so entries
//! never go stale; the cache only evicts on capacity.
//!
//! # Examples
//!
//! ```
//! use uni_mini_router::cache::ResolveCache;
//!
//! let mut cache = ResolveCache::new();
//! assert_eq!(cache.get("/pages/index"), None);
//! cache.insert("/pages/index".to_string(), Some(0));
//!
//! assert_eq!(cache.get("/pages/index"), Some(Some(0)));
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that fell through to the route table.
    pub misses: usize,
    /// Number of entries evicted to make room.
    pub evictions: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of path → record index lookups.
///
/// Default capacity is 256 entries.
#[derive(Debug)]
pub struct ResolveCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl ResolveCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` paths (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up a normalized path.
    ///
    /// `Some(None)` means the path is cached as matching no record.
    pub fn get(&mut self, path: &str) -> Option<Option<usize>> {
        if let Some(index) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolve cache hit for '{}'", path);
            Some(*index)
        } else {
            self.stats.misses += 1;
            trace_log!("Resolve cache miss for '{}'", path);
            None
        }
    }

    /// Remember the lookup result for `path`.
    pub fn insert(&mut self, path: String, index: Option<usize>) {
        if let Some((evicted, _)) = self.entries.push(path.clone(), index) {
            if evicted != path {
                self.stats.evictions += 1;
                debug_log!(
                    "Resolve cache evicted '{}' (hit rate: {:.1}%)",
                    evicted,
                    self.stats.hit_rate() * 100.0
                );
            }
        }
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_counters() {
        let mut cache = ResolveCache::new();
        assert!(cache.get("/a").is_none());
        cache.insert("/a".into(), Some(2));
        cache.insert("/missing".into(), None);

        assert_eq!(cache.get("/a"), Some(Some(2)));
        assert_eq!(cache.get("/missing"), Some(None));
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 1);
        assert!((cache.stats().hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eviction_is_lru() {
        let mut cache = ResolveCache::with_capacity(2);
        cache.insert("/a".into(), Some(0));
        cache.insert("/b".into(), Some(1));
        cache.get("/a");
        cache.insert("/c".into(), Some(2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("/b"), None);
        assert_eq!(cache.get("/a"), Some(Some(0)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_reinsert_is_not_eviction() {
        let mut cache = ResolveCache::with_capacity(2);
        cache.insert("/a".into(), Some(0));
        cache.insert("/a".into(), Some(0));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = ResolveCache::with_capacity(0);
        cache.insert("/a".into(), Some(0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_stats_rate() {
        assert!(CacheStats::default().hit_rate().abs() < f64::EPSILON);
    }
}
