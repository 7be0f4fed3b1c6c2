use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::availability::{
    AvailabilitySnapshot, DateAvailability, MAX_STAY_NIGHTS, stay_nights,
};
use crate::error::{Result, StayError};

/// Percentage fees applied on top of the nightly subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub service_fee_rate: Decimal,
    pub tax_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            service_fee_rate: Decimal::new(12, 2),
            tax_rate: Decimal::new(10, 2),
        }
    }
}

/// Largest nightly price, cleaning fee or override a listing may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Itemized price of a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub nights: u32,
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Average nightly rate. Differs from the base rate when overrides apply.
    pub fn nightly_average(&self) -> Decimal {
        if self.nights == 0 {
            return Decimal::ZERO;
        }
        self.subtotal / Decimal::from(self.nights)
    }
}

/// Breakdown lines labelled with the fee rates they were computed with.
pub struct Itemized<'a> {
    breakdown: &'a PriceBreakdown,
    fees: &'a FeeSchedule,
}

impl PriceBreakdown {
    pub fn itemized<'a>(&'a self, fees: &'a FeeSchedule) -> Itemized<'a> {
        Itemized {
            breakdown: self,
            fees,
        }
    }
}

impl std::fmt::Display for Itemized<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = self.breakdown;
        let unit = if b.nights == 1 { "night" } else { "nights" };
        writeln!(
            f,
            "€{} × {} {unit}: €{}",
            format_money(b.nightly_average()),
            b.nights,
            format_money(b.subtotal)
        )?;
        writeln!(f, "Cleaning fee: €{}", format_money(b.cleaning_fee))?;
        writeln!(
            f,
            "Service fee ({}): €{}",
            format_percent(self.fees.service_fee_rate),
            format_money(b.service_fee)
        )?;
        writeln!(
            f,
            "Taxes ({}): €{}",
            format_percent(self.fees.tax_rate),
            format_money(b.taxes)
        )?;
        write!(f, "Total: €{}", format_money(b.total))
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with exactly two decimals.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Render a fractional rate as a percentage, e.g. `0.12` as `12%`.
pub fn format_percent(rate: Decimal) -> String {
    rate.checked_mul(Decimal::ONE_HUNDRED)
        .map_or_else(|| rate.to_string(), |pct| format!("{}%", pct.normalize()))
}

/// Price a stay with the default fee schedule (12% service, 10% taxes).
pub fn compute_breakdown(
    base_rate: Decimal,
    cleaning_fee: Decimal,
    check_in: NaiveDate,
    check_out: NaiveDate,
    availability: &[DateAvailability],
) -> Result<PriceBreakdown> {
    compute_breakdown_with(
        &FeeSchedule::default(),
        base_rate,
        cleaning_fee,
        check_in,
        check_out,
        availability,
    )
}

fn overflow(what: &'static str) -> StayError {
    StayError::AmountOverflow { what }
}

/// Price a stay.
///
/// Each night in `[check_in, check_out)` is charged at its override price when
/// the availability snapshot carries one, else at `base_rate`. Service fee and
/// taxes are rounded individually before being added; the total is not rounded
/// again. Sums that leave the `Decimal` range yield `AmountOverflow`.
pub fn compute_breakdown_with(
    fees: &FeeSchedule,
    base_rate: Decimal,
    cleaning_fee: Decimal,
    check_in: NaiveDate,
    check_out: NaiveDate,
    availability: &[DateAvailability],
) -> Result<PriceBreakdown> {
    if check_out <= check_in {
        return Err(StayError::InvalidRange {
            check_in,
            check_out,
        });
    }
    let span = (check_out - check_in).num_days();
    if span > MAX_STAY_NIGHTS {
        return Err(StayError::InvalidParams {
            reason: format!("stays are limited to {MAX_STAY_NIGHTS} nights, requested {span}"),
        });
    }
    let nights = u32::try_from(span).map_err(|_| overflow("night count"))?;

    let snapshot = AvailabilitySnapshot::from_records(availability);
    let mut subtotal = Decimal::ZERO;
    for date in stay_nights(check_in, check_out) {
        subtotal = subtotal
            .checked_add(snapshot.nightly_rate(date, base_rate))
            .ok_or_else(|| overflow("subtotal"))?;
    }

    let service_fee = subtotal
        .checked_mul(fees.service_fee_rate)
        .map(round2)
        .ok_or_else(|| overflow("service fee"))?;
    let taxes = subtotal
        .checked_mul(fees.tax_rate)
        .map(round2)
        .ok_or_else(|| overflow("taxes"))?;
    let total = subtotal
        .checked_add(cleaning_fee)
        .and_then(|t| t.checked_add(service_fee))
        .and_then(|t| t.checked_add(taxes))
        .ok_or_else(|| overflow("total"))?;

    Ok(PriceBreakdown {
        nights,
        subtotal,
        cleaning_fee,
        service_fee,
        taxes,
        total,
    })
}
