use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::format_money;

/// A rentable property and the terms used to price and validate stays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub property_type: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub cleaning_fee: Decimal,
    pub max_guests: u32,
    #[serde(default)]
    pub host_approval_required: bool,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
}

/// How a caller identifies a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRef {
    Id(String),
    Slug(String),
}

impl ListingRef {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(s) | Self::Slug(s) => s,
        }
    }
}

impl std::fmt::Display for ListingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Slug(slug) => write!(f, "slug '{slug}'"),
        }
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# {}", self.title)?;
        write!(f, "Location: {}", self.city)?;
        if !self.country.is_empty() {
            write!(f, ", {}", self.country)?;
        }
        writeln!(f)?;
        writeln!(f, "Type: {}", self.property_type)?;
        writeln!(f, "Price: €{}/night", format_money(self.base_price))?;
        writeln!(f, "Cleaning fee: €{}", format_money(self.cleaning_fee))?;
        writeln!(f, "Max guests: {}", self.max_guests)?;
        if let Some(rating) = self.rating_avg {
            writeln!(f, "Rating: {rating:.2} ({} reviews)", self.rating_count)?;
        }
        if self.host_approval_required {
            writeln!(f, "Bookings require host approval")?;
        } else {
            writeln!(f, "Instant booking")?;
        }
        write!(f, "ID: {} | Slug: {}", self.id, self.slug)
    }
}
