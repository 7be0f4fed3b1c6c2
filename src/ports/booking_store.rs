use async_trait::async_trait;

use crate::domain::booking::{BookingIntent, BookingReceipt, BookingStatus};
use crate::error::Result;

/// Persistence boundary for bookings.
///
/// Implementations own the at-most-one-booking-per-night guarantee: the
/// availability check and the claim of every night happen atomically, and a
/// lost race is reported as `StayError::Conflict` without writing anything.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, intent: &BookingIntent) -> Result<BookingReceipt>;
    async fn get_booking(&self, id: &str) -> Result<BookingIntent>;
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<BookingReceipt>;
}
