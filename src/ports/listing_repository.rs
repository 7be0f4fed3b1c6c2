use async_trait::async_trait;

use crate::domain::listing::{Listing, ListingRef};
use crate::error::Result;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Unknown references yield `StayError::ListingNotFound`.
    async fn get_listing(&self, listing: &ListingRef) -> Result<Listing>;
    async fn list_listings(&self) -> Result<Vec<Listing>>;
}
