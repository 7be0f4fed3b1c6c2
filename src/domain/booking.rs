use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::PriceBreakdown;

/// A requested stay. `check_out` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRequest {
    pub listing_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: u32,
}

impl StayRequest {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Lifecycle of a booking.
///
/// `Pending -> Confirmed | Declined`, `Pending | Confirmed -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Declined,
    Cancelled,
}

impl BookingStatus {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Declined | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Whether a booking in this status keeps its nights claimed.
    pub fn holds_dates(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "DECLINED" => Some(Self::Declined),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Declined => write!(f, "DECLINED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Record handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingIntent {
    pub listing_id: String,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: u32,
    pub nightly_price_average: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
    pub status: BookingStatus,
}

/// What the persistence layer returns after accepting a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub id: String,
    pub status: BookingStatus,
}

/// Assemble the booking record for an already validated and priced stay.
pub fn build(
    request: &StayRequest,
    guest_id: &str,
    breakdown: &PriceBreakdown,
    host_approval_required: bool,
) -> BookingIntent {
    let status = if host_approval_required {
        BookingStatus::Pending
    } else {
        BookingStatus::Confirmed
    };

    BookingIntent {
        listing_id: request.listing_id.clone(),
        guest_id: guest_id.to_string(),
        check_in: request.check_in,
        check_out: request.check_out,
        guests_count: request.guests_count,
        nightly_price_average: breakdown.nightly_average(),
        cleaning_fee: breakdown.cleaning_fee,
        service_fee: breakdown.service_fee,
        taxes: breakdown.taxes,
        total: breakdown.total,
        status,
    }
}
