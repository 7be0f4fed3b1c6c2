use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::FeeSchedule;
use crate::domain::validation::StayPolicy;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: Decimal,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    #[serde(default = "default_min_nights")]
    pub min_nights: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: default_service_fee_rate(),
            tax_rate: default_tax_rate(),
            min_nights: default_min_nights(),
        }
    }
}

impl PricingConfig {
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            service_fee_rate: self.service_fee_rate,
            tax_rate: self.tax_rate,
        }
    }

    pub fn stay_policy(&self) -> StayPolicy {
        StayPolicy {
            min_nights: self.min_nights,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_listing_ttl")]
    pub listing_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            listing_ttl_secs: default_listing_ttl(),
        }
    }
}

/// Where seed listings and availability come from.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_service_fee_rate() -> Decimal {
    FeeSchedule::default().service_fee_rate
}

fn default_tax_rate() -> Decimal {
    FeeSchedule::default().tax_rate
}

fn default_min_nights() -> u32 {
    StayPolicy::default().min_nights
}

fn default_max_entries() -> usize {
    500
}

fn default_listing_ttl() -> u64 {
    300
}
