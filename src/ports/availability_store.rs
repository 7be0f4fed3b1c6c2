use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::availability::DateAvailability;
use crate::error::Result;

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Records for `listing_id` with `from <= date < to`, ordered by date.
    async fn get_range(
        &self,
        listing_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateAvailability>>;
}
