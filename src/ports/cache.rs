use std::time::Duration;

use crate::domain::listing::Listing;

pub trait ListingCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Listing>;
    fn set(&self, key: &str, listing: Listing, ttl: Duration);
}
