use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::domain::listing::Listing;
use crate::ports::cache::ListingCache;

struct CacheEntry {
    listing: Listing,
    expires_at: Instant,
}

/// Bounded LRU of listing terms with a per-entry TTL.
pub struct MemoryCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or_else(|| {
            tracing::warn!("Cache max_entries was 0, defaulting to 100");
            NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN)
        });
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }
}

impl ListingCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Listing> {
        let Ok(mut cache) = self.inner.lock() else {
            tracing::error!("Cache lock poisoned on get('{key}'), returning miss");
            return None;
        };
        let entry = cache.get(key)?;
        if Instant::now() > entry.expires_at {
            cache.pop(key);
            return None;
        }
        Some(entry.listing.clone())
    }

    fn set(&self, key: &str, listing: Listing, ttl: Duration) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(
                key.to_string(),
                CacheEntry {
                    listing,
                    expires_at: Instant::now() + ttl,
                },
            );
        } else {
            tracing::error!("Cache lock poisoned on set('{key}'), skipping write");
        }
    }
}
