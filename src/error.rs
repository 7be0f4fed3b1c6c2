use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::booking::BookingStatus;
use crate::domain::validation::Rejection;

#[derive(Error, Debug)]
pub enum StayError {
    #[error("Invalid date range: check-out {check_out} must be after check-in {check_in}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Stay rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Listing not found: {id}")]
    ListingNotFound { id: String },

    #[error("Booking not found: {id}")]
    BookingNotFound { id: String },

    #[error("Dates no longer available, please pick new dates (listing {listing_id}, {date})")]
    Conflict { listing_id: String, date: NaiveDate },

    #[error("Booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Amount out of range while computing the {what}")]
    AmountOverflow { what: &'static str },

    #[error("Date {date} is booked and cannot be edited")]
    CalendarLocked { date: NaiveDate },

    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, StayError>;
