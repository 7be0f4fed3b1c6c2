use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::availability::{AvailabilityStatus, DateAvailability};
use crate::domain::listing::Listing;
use crate::domain::pricing::MAX_AMOUNT;
use crate::error::{Result, StayError};

/// Seed data: listings plus their per-date availability records.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub availability: Vec<CatalogDay>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogDay {
    pub listing_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub price_override: Option<Decimal>,
}

impl CatalogDay {
    pub fn to_record(&self) -> DateAvailability {
        DateAvailability {
            date: self.date,
            status: self.status,
            price_override: self.price_override,
        }
    }
}

fn invalid(reason: String) -> StayError {
    StayError::InvalidParams { reason }
}

impl Catalog {
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for listing in &self.listings {
            if !ids.insert(listing.id.as_str()) {
                return Err(invalid(format!("duplicate listing id '{}'", listing.id)));
            }
            if !slugs.insert(listing.slug.as_str()) {
                return Err(invalid(format!("duplicate listing slug '{}'", listing.slug)));
            }
            if listing.base_price <= Decimal::ZERO {
                return Err(invalid(format!(
                    "listing '{}' must have a positive base price",
                    listing.id
                )));
            }
            if listing.base_price > MAX_AMOUNT || listing.cleaning_fee > MAX_AMOUNT {
                return Err(invalid(format!(
                    "listing '{}' prices must not exceed {MAX_AMOUNT}",
                    listing.id
                )));
            }
            if listing.cleaning_fee < Decimal::ZERO {
                return Err(invalid(format!(
                    "listing '{}' has a negative cleaning fee",
                    listing.id
                )));
            }
            if listing.max_guests == 0 {
                return Err(invalid(format!(
                    "listing '{}' must accept at least one guest",
                    listing.id
                )));
            }
        }
        for day in &self.availability {
            if !ids.contains(day.listing_id.as_str()) {
                return Err(invalid(format!(
                    "availability for {} references unknown listing '{}'",
                    day.date, day.listing_id
                )));
            }
            if day
                .price_override
                .is_some_and(|p| p <= Decimal::ZERO || p > MAX_AMOUNT)
            {
                return Err(invalid(format!(
                    "price override for listing '{}' on {} must be positive and at most {MAX_AMOUNT}",
                    day.listing_id, day.date
                )));
            }
        }
        Ok(())
    }
}

pub fn parse_catalog(yaml: &str) -> Result<Catalog> {
    let catalog: Catalog = serde_yml::from_str(yaml)?;
    catalog.validate()?;
    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StayError::Config(format!(
            "failed to read catalog file {}: {e}",
            path.display()
        ))
    })?;
    let catalog = parse_catalog(&content)?;
    tracing::info!(
        path = %path.display(),
        listings = catalog.listings.len(),
        availability = catalog.availability.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SAMPLE: &str = "\
listings:
  - id: l-1
    slug: sea-view-loft
    title: Sea View Loft
    city: Lisbon
    country: Portugal
    property_type: loft
    base_price: 100
    cleaning_fee: 20
    max_guests: 4
    host_approval_required: true
availability:
  - listing_id: l-1
    date: 2025-06-02
    price_override: 150
  - listing_id: l-1
    date: 2025-06-05
    status: BOOKED
";

    #[test]
    fn parse_sample_catalog() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.listings.len(), 1);
        assert!(catalog.listings[0].host_approval_required);
        assert_eq!(catalog.availability.len(), 2);
        let first = catalog.availability[0].to_record();
        assert_eq!(first.status, AvailabilityStatus::Open);
        assert_eq!(first.price_override, Some(Decimal::from(150)));
        assert_eq!(catalog.availability[1].status, AvailabilityStatus::Booked);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = parse_catalog("{}").unwrap();
        assert!(catalog.listings.is_empty());
    }

    #[test]
    fn unknown_listing_in_availability_rejected() {
        let yaml = "availability:\n  - listing_id: ghost\n    date: 2025-06-01\n";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn duplicate_slug_rejected() {
        let yaml = "\
listings:
  - {id: a, slug: same, title: A, city: X, property_type: loft, base_price: 10, max_guests: 1}
  - {id: b, slug: same, title: B, city: X, property_type: loft, base_price: 10, max_guests: 1}
";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate listing slug"));
    }

    #[test]
    fn zero_base_price_rejected() {
        let yaml = "listings:\n  - {id: a, slug: a, title: A, city: X, property_type: loft, base_price: 0, max_guests: 1}\n";
        assert!(parse_catalog(yaml).is_err());
    }

    #[test]
    fn out_of_range_base_price_rejected() {
        let yaml = "listings:\n  - {id: a, slug: a, title: A, city: X, property_type: loft, base_price: \"50000000000000000000000000000\", max_guests: 1}\n";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn out_of_range_cleaning_fee_rejected() {
        let yaml = "listings:\n  - {id: a, slug: a, title: A, city: X, property_type: loft, base_price: 10, cleaning_fee: 2000000, max_guests: 1}\n";
        assert!(parse_catalog(yaml).is_err());
    }

    #[test]
    fn out_of_range_override_rejected() {
        let yaml = "\
listings:
  - {id: a, slug: a, title: A, city: X, property_type: loft, base_price: 10, max_guests: 1}
availability:
  - {listing_id: a, date: 2025-06-01, price_override: 1000001}
";
        assert!(parse_catalog(yaml).is_err());
    }

    #[test]
    fn negative_override_rejected() {
        let yaml = "\
listings:
  - {id: a, slug: a, title: A, city: X, property_type: loft, base_price: 10, max_guests: 1}
availability:
  - {listing_id: a, date: 2025-06-01, price_override: -5}
";
        assert!(parse_catalog(yaml).is_err());
    }

    #[test]
    fn invalid_yaml_rejected() {
        assert!(parse_catalog("{{{{invalid yaml: [[[").is_err());
    }

    #[test]
    fn load_catalog_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{SAMPLE}").unwrap();
        let catalog = load_catalog(tmp.path()).unwrap();
        assert_eq!(catalog.listings[0].slug, "sea-view-loft");
    }

    #[test]
    fn load_catalog_missing_file_is_config_error() {
        let err = load_catalog(Path::new("/tmp/nonexistent_staylite_catalog_12345.yaml"))
            .unwrap_err();
        assert!(matches!(err, StayError::Config(_)));
    }
}
