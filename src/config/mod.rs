pub mod types;

use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{Result, StayError};
use types::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        StayError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    let config: Config = serde_yml::from_str(&content)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &Config) -> Result<()> {
    let pricing = &config.pricing;
    for (name, rate) in [
        ("service_fee_rate", pricing.service_fee_rate),
        ("tax_rate", pricing.tax_rate),
    ] {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(StayError::Config(format!(
                "pricing.{name} must be in [0, 1), got {rate}"
            )));
        }
    }
    if pricing.min_nights == 0 {
        return Err(StayError::Config(
            "pricing.min_nights must be at least 1".into(),
        ));
    }
    Ok(())
}
