pub mod cached_listings;
pub mod memory_cache;
