use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::catalog::Catalog;
use crate::domain::availability::{AvailabilityStatus, DateAvailability, stay_nights};
use crate::domain::booking::{BookingIntent, BookingReceipt, BookingStatus};
use crate::domain::listing::{Listing, ListingRef};
use crate::domain::pricing::MAX_AMOUNT;
use crate::error::{Result, StayError};
use crate::ports::availability_store::AvailabilityStore;
use crate::ports::booking_store::BookingStore;
use crate::ports::listing_repository::ListingRepository;

#[derive(Default)]
struct State {
    listings: BTreeMap<String, Listing>,
    calendars: HashMap<String, BTreeMap<NaiveDate, DateAvailability>>,
    bookings: HashMap<String, BookingIntent>,
}

impl State {
    fn ensure_listing(&self, listing_id: &str) -> Result<()> {
        if self.listings.contains_key(listing_id) {
            Ok(())
        } else {
            Err(StayError::ListingNotFound {
                id: listing_id.to_string(),
            })
        }
    }

    fn editable_day(&mut self, listing_id: &str, date: NaiveDate) -> Result<&mut DateAvailability> {
        self.ensure_listing(listing_id)?;
        let day = self
            .calendars
            .entry(listing_id.to_string())
            .or_default()
            .entry(date)
            .or_insert_with(|| DateAvailability::new(date, AvailabilityStatus::Open));
        if day.status == AvailabilityStatus::Booked {
            return Err(StayError::CalendarLocked { date });
        }
        Ok(day)
    }
}

/// Listings, per-date availability and bookings behind a single lock.
///
/// Sharing one lock is what makes `create_booking` atomic: the re-check of
/// every night and the claim of those nights happen under the same write guard.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an already validated catalog.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let mut state = State::default();
        for listing in catalog.listings {
            state.listings.insert(listing.id.clone(), listing);
        }
        for entry in catalog.availability {
            let record = entry.to_record();
            state
                .calendars
                .entry(entry.listing_id)
                .or_default()
                .insert(record.date, record);
        }
        info!(
            listings = state.listings.len(),
            calendars = state.calendars.len(),
            "In-memory store seeded from catalog"
        );
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn insert_listing(&self, listing: Listing) {
        self.state
            .write()
            .await
            .listings
            .insert(listing.id.clone(), listing);
    }

    /// Host action: open or block a date. BOOKED is only ever set by a booking.
    pub async fn set_date_status(
        &self,
        listing_id: &str,
        date: NaiveDate,
        status: AvailabilityStatus,
    ) -> Result<()> {
        if status == AvailabilityStatus::Booked {
            return Err(StayError::InvalidParams {
                reason: "dates become BOOKED through bookings only".into(),
            });
        }
        let mut state = self.state.write().await;
        let day = state.editable_day(listing_id, date)?;
        day.status = status;
        debug!(listing_id, %date, %status, "Date status updated");
        Ok(())
    }

    /// Host action: price a single night differently from the base rate.
    pub async fn set_price_override(
        &self,
        listing_id: &str,
        date: NaiveDate,
        price: Decimal,
    ) -> Result<()> {
        if price <= Decimal::ZERO || price > MAX_AMOUNT {
            return Err(StayError::InvalidParams {
                reason: format!("price override must be in (0, {MAX_AMOUNT}], got {price}"),
            });
        }
        let mut state = self.state.write().await;
        let day = state.editable_day(listing_id, date)?;
        day.price_override = Some(price);
        debug!(listing_id, %date, %price, "Price override set");
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn get_listing(&self, listing: &ListingRef) -> Result<Listing> {
        let state = self.state.read().await;
        let found = match listing {
            ListingRef::Id(id) => state.listings.get(id),
            ListingRef::Slug(slug) => state.listings.values().find(|l| &l.slug == slug),
        };
        found.cloned().ok_or_else(|| StayError::ListingNotFound {
            id: listing.as_str().to_string(),
        })
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.state.read().await.listings.values().cloned().collect())
    }
}

#[async_trait]
impl AvailabilityStore for InMemoryStore {
    async fn get_range(
        &self,
        listing_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateAvailability>> {
        let state = self.state.read().await;
        let Some(calendar) = state.calendars.get(listing_id) else {
            return Ok(Vec::new());
        };
        if to <= from {
            return Ok(Vec::new());
        }
        Ok(calendar.range(from..to).map(|(_, d)| d.clone()).collect())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn create_booking(&self, intent: &BookingIntent) -> Result<BookingReceipt> {
        if !intent.status.holds_dates() {
            return Err(StayError::InvalidParams {
                reason: format!("a new booking cannot start as {}", intent.status),
            });
        }
        if intent.check_out <= intent.check_in {
            return Err(StayError::InvalidRange {
                check_in: intent.check_in,
                check_out: intent.check_out,
            });
        }

        let mut state = self.state.write().await;
        state.ensure_listing(&intent.listing_id)?;

        let calendar = state
            .calendars
            .entry(intent.listing_id.clone())
            .or_default();
        if let Some(date) = stay_nights(intent.check_in, intent.check_out).find(|date| {
            calendar
                .get(date)
                .is_some_and(|d| d.status.is_unavailable())
        }) {
            info!(listing_id = %intent.listing_id, %date, "Booking rejected: night already taken");
            return Err(StayError::Conflict {
                listing_id: intent.listing_id.clone(),
                date,
            });
        }

        for date in stay_nights(intent.check_in, intent.check_out) {
            calendar
                .entry(date)
                .or_insert_with(|| DateAvailability::new(date, AvailabilityStatus::Open))
                .status = AvailabilityStatus::Booked;
        }

        let id = Uuid::new_v4().to_string();
        state.bookings.insert(id.clone(), intent.clone());
        info!(
            booking_id = %id,
            listing_id = %intent.listing_id,
            status = %intent.status,
            "Booking created"
        );
        Ok(BookingReceipt {
            id,
            status: intent.status,
        })
    }

    async fn get_booking(&self, id: &str) -> Result<BookingIntent> {
        self.state
            .read()
            .await
            .bookings
            .get(id)
            .cloned()
            .ok_or_else(|| StayError::BookingNotFound { id: id.to_string() })
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<BookingReceipt> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let booking = state
            .bookings
            .get_mut(id)
            .ok_or_else(|| StayError::BookingNotFound { id: id.to_string() })?;

        if !booking.status.can_transition_to(status) {
            return Err(StayError::InvalidTransition {
                from: booking.status,
                to: status,
            });
        }

        if !status.holds_dates()
            && let Some(calendar) = state.calendars.get_mut(&booking.listing_id)
        {
            for date in stay_nights(booking.check_in, booking.check_out) {
                if let Some(day) = calendar.get_mut(&date)
                    && day.status == AvailabilityStatus::Booked
                {
                    day.status = AvailabilityStatus::Open;
                }
            }
        }

        info!(booking_id = id, from = %booking.status, to = %status, "Booking status updated");
        booking.status = status;
        Ok(BookingReceipt {
            id: id.to_string(),
            status,
        })
    }
}
