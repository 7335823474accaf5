//! TTL'd LRU cache for query responses.
//!
//! The pipeline is deterministic for a fixed ledger, but relative date
//! rules shift with the clock, so entries expire after a short TTL.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use crate::pipeline::QueryResponse;

struct CachedEntry {
    response: QueryResponse,
    inserted: Instant,
}

/// LRU cache of query responses with per-entry TTL.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CachedEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache holding up to `capacity` responses for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Get a cached response, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<QueryResponse> {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get(key) {
            if entry.inserted.elapsed() < self.ttl {
                return Some(entry.response.clone());
            }
            entries.pop(key);
        }
        None
    }

    pub fn put(&self, key: String, response: QueryResponse) {
        let mut entries = self.entries.lock();
        entries.put(
            key,
            CachedEntry {
                response,
                inserted: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Entities, Intent, IntentResult};
    use crate::engine::QueryOutcome;

    fn response(query: &str) -> QueryResponse {
        QueryResponse {
            query: query.to_string(),
            intent: IntentResult {
                label: Intent::TotalSpend,
                score: 0.9,
                margin: 0.5,
            },
            entities: Entities::default(),
            start_date: None,
            end_date: None,
            result: QueryOutcome::Total(100),
            warnings: Vec::new(),
            elapsed_ms: 0.1,
            cached: false,
        }
    }

    #[test]
    fn test_cache_hit() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        cache.put("total:none".into(), response("total"));

        let hit = cache.get("total:none").unwrap();
        assert_eq!(hit.query, "total");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_miss() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        assert!(cache.get("nothing").is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = ResponseCache::new(10, Duration::from_secs(0));
        cache.put("total:none".into(), response("total"));

        assert!(cache.get("total:none").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_eviction() {
        let cache = ResponseCache::new(2, Duration::from_secs(60));
        cache.put("a".into(), response("a"));
        cache.put("b".into(), response("b"));
        cache.put("c".into(), response("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        cache.put("a".into(), response("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
