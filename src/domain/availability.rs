use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bookable state of a single calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AvailabilityStatus {
    #[default]
    Open,
    /// The host has manually blocked this date.
    Blocked,
    /// A booking holds this date.
    Booked,
}

impl AvailabilityStatus {
    pub fn is_unavailable(self) -> bool {
        matches!(self, Self::Blocked | Self::Booked)
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::Booked => write!(f, "BOOKED"),
        }
    }
}

/// Per-date record for one listing. A date without a record is OPEN at the base rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateAvailability {
    pub date: NaiveDate,
    #[serde(default)]
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub price_override: Option<Decimal>,
}

impl DateAvailability {
    pub fn new(date: NaiveDate, status: AvailabilityStatus) -> Self {
        Self {
            date,
            status,
            price_override: None,
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price_override = Some(price);
        self
    }
}

/// Longest range, in nights, that a quote, booking or dated search may span.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Iterate the nights of a stay: every date in `[check_in, check_out)`.
pub fn stay_nights(check_in: NaiveDate, check_out: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    check_in
        .iter_days()
        .take_while(move |date| *date < check_out)
}

/// Records of a listing keyed by calendar date.
///
/// When the input carries several records for one date the last one wins,
/// matching an upsert keyed on `(listing, date)`.
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySnapshot {
    days: BTreeMap<NaiveDate, DateAvailability>,
}

impl AvailabilitySnapshot {
    pub fn from_records(records: &[DateAvailability]) -> Self {
        let days = records
            .iter()
            .map(|record| (record.date, record.clone()))
            .collect();
        Self { days }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DateAvailability> {
        self.days.get(&date)
    }

    pub fn status_on(&self, date: NaiveDate) -> AvailabilityStatus {
        self.get(date).map_or(AvailabilityStatus::Open, |d| d.status)
    }

    /// Rate charged for the night of `date`: the override if one is set, else `base_rate`.
    pub fn nightly_rate(&self, date: NaiveDate, base_rate: Decimal) -> Decimal {
        self.get(date)
            .and_then(|d| d.price_override)
            .unwrap_or(base_rate)
    }

    /// First night in `[check_in, check_out)` that is BLOCKED or BOOKED.
    pub fn first_unavailable(&self, check_in: NaiveDate, check_out: NaiveDate) -> Option<NaiveDate> {
        if check_out <= check_in {
            return None;
        }
        self.days
            .range(check_in..check_out)
            .find(|(_, day)| day.status.is_unavailable())
            .map(|(date, _)| *date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl std::fmt::Display for AvailabilitySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<12} {:>8} {:>10}", "Date", "Status", "Price")?;
        writeln!(f, "{}", "-".repeat(32))?;
        for day in self.days.values() {
            let price = day
                .price_override
                .map_or_else(|| "base".to_string(), |p| format!("{p:.2}"));
            writeln!(f, "{:<12} {:>8} {:>10}", day.date, day.status, price)?;
        }
        Ok(())
    }
}
