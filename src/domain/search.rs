use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::availability::MAX_STAY_NIGHTS;
use crate::domain::listing::Listing;
use crate::error::{Result, StayError};

#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub location: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub property_type: Option<String>,
}

impl SearchFilters {
    pub fn validate(&self) -> Result<()> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => {
                if check_out <= check_in {
                    return Err(StayError::InvalidParams {
                        reason: "check-out date must be after check-in date".into(),
                    });
                }
                if (check_out - check_in).num_days() > MAX_STAY_NIGHTS {
                    return Err(StayError::InvalidParams {
                        reason: format!("date range is limited to {MAX_STAY_NIGHTS} nights"),
                    });
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(StayError::InvalidParams {
                    reason: "both check-in and check-out must be provided together".into(),
                });
            }
            _ => {}
        }

        if let Some(min) = self.min_price
            && let Some(max) = self.max_price
            && min > max
        {
            return Err(StayError::InvalidParams {
                reason: "min_price cannot be greater than max_price".into(),
            });
        }

        Ok(())
    }

    /// Date range to check availability against, when both dates are set.
    pub fn stay_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.check_in.zip(self.check_out)
    }

    /// Static listing filters. Availability is checked separately.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(ref location) = self.location {
            let needle = location.trim().to_lowercase();
            if !needle.is_empty() && !listing.city.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(guests) = self.guests
            && listing.max_guests < guests
        {
            return false;
        }
        if let Some(min) = self.min_price
            && listing.base_price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && listing.base_price > max
        {
            return false;
        }
        if let Some(ref property_type) = self.property_type
            && !listing.property_type.eq_ignore_ascii_case(property_type)
        {
            return false;
        }
        true
    }
}
