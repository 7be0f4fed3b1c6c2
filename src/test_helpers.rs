use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::availability::{AvailabilityStatus, DateAvailability};
use crate::domain::booking::{BookingIntent, BookingStatus, StayRequest};
use crate::domain::listing::Listing;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn open_at(day: &str, price: i64) -> DateAvailability {
    DateAvailability::new(date(day), AvailabilityStatus::Open).with_price(Decimal::from(price))
}

pub fn blocked(day: &str) -> DateAvailability {
    DateAvailability::new(date(day), AvailabilityStatus::Blocked)
}

pub fn booked(day: &str) -> DateAvailability {
    DateAvailability::new(date(day), AvailabilityStatus::Booked)
}

/// Lisbon apartment, cleaning fee 20, up to 4 guests, instant booking.
pub fn make_listing(id: &str, base_price: i64) -> Listing {
    Listing {
        id: id.to_string(),
        slug: format!("listing-{id}"),
        title: format!("Listing {id}"),
        city: "Lisbon".into(),
        country: "Portugal".into(),
        property_type: "apartment".into(),
        base_price: Decimal::from(base_price),
        cleaning_fee: Decimal::from(20),
        max_guests: 4,
        host_approval_required: false,
        rating_avg: None,
        rating_count: 0,
    }
}

pub fn stay(listing_id: &str, check_in: &str, check_out: &str, guests: u32) -> StayRequest {
    StayRequest {
        listing_id: listing_id.to_string(),
        check_in: date(check_in),
        check_out: date(check_out),
        guests_count: guests,
    }
}

pub fn make_intent(
    listing_id: &str,
    check_in: &str,
    check_out: &str,
    status: BookingStatus,
) -> BookingIntent {
    BookingIntent {
        listing_id: listing_id.to_string(),
        guest_id: "guest-1".into(),
        check_in: date(check_in),
        check_out: date(check_out),
        guests_count: 2,
        nightly_price_average: Decimal::from(100),
        cleaning_fee: Decimal::from(20),
        service_fee: Decimal::from(36),
        taxes: Decimal::from(30),
        total: Decimal::from(386),
        status,
    }
}
