use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::availability::{AvailabilitySnapshot, DateAvailability};

/// Booking rules that do not depend on the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPolicy {
    pub min_nights: u32,
}

impl Default for StayPolicy {
    fn default() -> Self {
        Self { min_nights: 2 }
    }
}

/// Why a requested stay cannot be booked. Only the first failing check is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("check-in and check-out dates are required")]
    MissingDates,

    #[error("minimum stay is {minimum} nights, requested {nights}")]
    MinimumStayNotMet { nights: i64, minimum: u32 },

    #[error("maximum {max_guests} guests allowed, requested {requested}")]
    GuestsExceedCapacity { requested: u32, max_guests: u32 },

    #[error("date {date} is not available")]
    DateUnavailable { date: NaiveDate },
}

impl Rejection {
    /// Stable reason code for callers that render field-specific messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDates => "MissingDates",
            Self::MinimumStayNotMet { .. } => "MinimumStayNotMet",
            Self::GuestsExceedCapacity { .. } => "GuestsExceedCapacity",
            Self::DateUnavailable { .. } => "DateUnavailable",
        }
    }
}

/// Decide whether a stay is bookable with the default policy (2-night minimum).
pub fn validate(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    guests_count: u32,
    max_guests: u32,
    availability: &[DateAvailability],
    today: NaiveDate,
) -> Result<(), Rejection> {
    StayPolicy::default().validate(
        check_in,
        check_out,
        guests_count,
        max_guests,
        availability,
        today,
    )
}

impl StayPolicy {
    /// Checks run in order: dates present, minimum stay, capacity, then each
    /// night in `[check_in, check_out)` must be on or after `today` and not
    /// BLOCKED or BOOKED.
    pub fn validate(
        &self,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        guests_count: u32,
        max_guests: u32,
        availability: &[DateAvailability],
        today: NaiveDate,
    ) -> Result<(), Rejection> {
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Err(Rejection::MissingDates);
        };

        let nights = (check_out - check_in).num_days();
        if nights < i64::from(self.min_nights) {
            return Err(Rejection::MinimumStayNotMet {
                nights,
                minimum: self.min_nights,
            });
        }

        if guests_count > max_guests {
            return Err(Rejection::GuestsExceedCapacity {
                requested: guests_count,
                max_guests,
            });
        }

        // check_in is the earliest night, so it is the first past one if any
        if check_in < check_out && check_in < today {
            return Err(Rejection::DateUnavailable { date: check_in });
        }
        let snapshot = AvailabilitySnapshot::from_records(availability);
        if let Some(date) = snapshot.first_unavailable(check_in, check_out) {
            return Err(Rejection::DateUnavailable { date });
        }

        Ok(())
    }
}
