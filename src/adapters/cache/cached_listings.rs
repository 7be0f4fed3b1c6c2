use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::listing::{Listing, ListingRef};
use crate::error::Result;
use crate::ports::cache::ListingCache;
use crate::ports::listing_repository::ListingRepository;

/// Caches listing lookups. Availability is never cached: it is re-read for
/// every quote and booking.
pub struct CachedListingRepository {
    inner: Arc<dyn ListingRepository>,
    cache: Arc<dyn ListingCache>,
    ttl: Duration,
}

impl CachedListingRepository {
    pub fn new(inner: Arc<dyn ListingRepository>, cache: Arc<dyn ListingCache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

fn cache_key(listing: &ListingRef) -> String {
    match listing {
        ListingRef::Id(id) => format!("id:{id}"),
        ListingRef::Slug(slug) => format!("slug:{slug}"),
    }
}

#[async_trait]
impl ListingRepository for CachedListingRepository {
    async fn get_listing(&self, listing: &ListingRef) -> Result<Listing> {
        let key = cache_key(listing);
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "Listing cache hit");
            return Ok(hit);
        }
        let found = self.inner.get_listing(listing).await?;
        self.cache
            .set(&cache_key(&ListingRef::Id(found.id.clone())), found.clone(), self.ttl);
        self.cache
            .set(&cache_key(&ListingRef::Slug(found.slug.clone())), found.clone(), self.ttl);
        Ok(found)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        self.inner.list_listings().await
    }
}
