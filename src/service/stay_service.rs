use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::availability::{AvailabilitySnapshot, MAX_STAY_NIGHTS};
use crate::domain::booking::{self, BookingIntent, BookingReceipt, BookingStatus, StayRequest};
use crate::domain::listing::{Listing, ListingRef};
use crate::domain::pricing::{FeeSchedule, PriceBreakdown, compute_breakdown_with};
use crate::domain::search::SearchFilters;
use crate::domain::validation::{Rejection, StayPolicy};
use crate::error::{Result, StayError};
use crate::ports::availability_store::AvailabilityStore;
use crate::ports::booking_store::BookingStore;
use crate::ports::clock::Clock;
use crate::ports::listing_repository::ListingRepository;

/// A validated and priced stay.
#[derive(Debug, Clone)]
pub struct Quote {
    pub listing: Listing,
    pub request: StayRequest,
    pub breakdown: PriceBreakdown,
    pub fees: FeeSchedule,
    pub requires_host_approval: bool,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# {}", self.listing.title)?;
        writeln!(
            f,
            "{} to {} | {} guests",
            self.request.check_in, self.request.check_out, self.request.guests_count
        )?;
        writeln!(f, "{}", self.breakdown.itemized(&self.fees))?;
        if self.requires_host_approval {
            write!(f, "This property requires host approval; the booking will be PENDING until the host responds.")
        } else {
            write!(f, "Instant booking: the reservation is confirmed immediately.")
        }
    }
}

/// Listing lookup -> fresh availability -> validation -> pricing -> booking.
pub struct StayService {
    listings: Arc<dyn ListingRepository>,
    availability: Arc<dyn AvailabilityStore>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    fees: FeeSchedule,
    policy: StayPolicy,
}

impl StayService {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        availability: Arc<dyn AvailabilityStore>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            listings,
            availability,
            bookings,
            clock,
            fees: FeeSchedule::default(),
            policy: StayPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, fees: FeeSchedule, policy: StayPolicy) -> Self {
        self.fees = fees;
        self.policy = policy;
        self
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn policy(&self) -> &StayPolicy {
        &self.policy
    }

    pub async fn listing(&self, listing: &ListingRef) -> Result<Listing> {
        self.listings.get_listing(listing).await
    }

    /// Per-date records of a listing for `[from, to)`.
    pub async fn availability(
        &self,
        listing: &ListingRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(Listing, AvailabilitySnapshot)> {
        if to <= from {
            return Err(StayError::InvalidRange {
                check_in: from,
                check_out: to,
            });
        }
        let listing = self.listings.get_listing(listing).await?;
        let records = self.availability.get_range(&listing.id, from, to).await?;
        Ok((listing, AvailabilitySnapshot::from_records(&records)))
    }

    /// Validate and price a stay against availability read just now.
    pub async fn quote(
        &self,
        listing: &ListingRef,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        guests: u32,
    ) -> Result<Quote> {
        if guests == 0 {
            return Err(StayError::InvalidParams {
                reason: "at least one guest is required".into(),
            });
        }
        if let (Some(from), Some(to)) = (check_in, check_out)
            && (to - from).num_days() > MAX_STAY_NIGHTS
        {
            return Err(StayError::InvalidParams {
                reason: format!("stays are limited to {MAX_STAY_NIGHTS} nights"),
            });
        }
        let listing = self.listings.get_listing(listing).await?;

        let records = match (check_in, check_out) {
            (Some(from), Some(to)) if to > from => {
                self.availability.get_range(&listing.id, from, to).await?
            }
            _ => Vec::new(),
        };

        self.policy.validate(
            check_in,
            check_out,
            guests,
            listing.max_guests,
            &records,
            self.clock.today(),
        )?;

        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Err(Rejection::MissingDates.into());
        };
        let breakdown = compute_breakdown_with(
            &self.fees,
            listing.base_price,
            listing.cleaning_fee,
            check_in,
            check_out,
            &records,
        )?;
        debug!(
            listing_id = %listing.id,
            nights = breakdown.nights,
            total = %breakdown.total,
            "Stay quoted"
        );

        Ok(Quote {
            request: StayRequest {
                listing_id: listing.id.clone(),
                check_in,
                check_out,
                guests_count: guests,
            },
            requires_host_approval: listing.host_approval_required,
            breakdown,
            fees: self.fees,
            listing,
        })
    }

    /// Quote, assemble and persist a booking. A `Conflict` from the store means
    /// another booking won the race; callers should re-quote with new dates.
    pub async fn book(
        &self,
        listing: &ListingRef,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
        guest_id: &str,
    ) -> Result<(Quote, BookingReceipt)> {
        if guest_id.trim().is_empty() {
            return Err(StayError::InvalidParams {
                reason: "guest id is required".into(),
            });
        }
        let quote = self
            .quote(listing, Some(check_in), Some(check_out), guests)
            .await?;
        let intent = booking::build(
            &quote.request,
            guest_id,
            &quote.breakdown,
            quote.requires_host_approval,
        );

        match self.bookings.create_booking(&intent).await {
            Ok(receipt) => {
                info!(
                    booking_id = %receipt.id,
                    listing_id = %intent.listing_id,
                    status = %receipt.status,
                    "Stay booked"
                );
                Ok((quote, receipt))
            }
            Err(e @ StayError::Conflict { .. }) => {
                warn!(error = %e, listing_id = %intent.listing_id, "Booking lost a race for its dates");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<BookingIntent> {
        self.bookings.get_booking(booking_id).await
    }

    /// Host or guest action on an existing booking.
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<BookingReceipt> {
        self.bookings.update_status(booking_id, status).await
    }

    /// Listings matching the filters; with dates, only those free for every night.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Listing>> {
        filters.validate()?;
        let mut found: Vec<Listing> = self
            .listings
            .list_listings()
            .await?
            .into_iter()
            .filter(|l| filters.matches(l))
            .collect();

        if let Some((check_in, check_out)) = filters.stay_range() {
            let mut free = Vec::with_capacity(found.len());
            for listing in found {
                let records = self
                    .availability
                    .get_range(&listing.id, check_in, check_out)
                    .await?;
                let snapshot = AvailabilitySnapshot::from_records(&records);
                if snapshot.first_unavailable(check_in, check_out).is_none() {
                    free.push(listing);
                }
            }
            found = free;
        }

        found.sort_by(|a, b| {
            a.base_price
                .cmp(&b.base_price)
                .then_with(|| a.title.cmp(&b.title))
        });
        debug!(results = found.len(), "Search completed");
        Ok(found)
    }
}
